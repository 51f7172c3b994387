use crate::error::{CurveError, Result};
use crate::traits::Validate;

/// Thresholds below which lengths, speeds and angles count as zero.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distances, and curve speeds in model units per unit parameter.
    pub linear: f64,
    /// Angles in radians.
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-7;
    pub const DEFAULT_ANGULAR: f64 = 1e-10;

    /// Default angular threshold with a caller-chosen linear one.
    pub fn with_linear(linear: f64) -> Result<Self> {
        Self {
            linear,
            ..Self::default()
        }
        .validated()
    }

    /// A length that cannot be told apart from zero.
    pub fn is_negligible(self, length: f64) -> bool {
        length.abs() < self.linear
    }

    /// Whether `length` is 1 up to the linear threshold, as for direction vectors.
    pub fn is_unit(self, length: f64) -> bool {
        self.is_negligible(length - 1.0)
    }

    /// A sampled curve speed too small (or not a number) to count as moving.
    pub fn is_standstill(self, speed: f64) -> bool {
        !(speed >= self.linear)
    }

    pub fn is_negligible_angle(self, angle: f64) -> bool {
        angle.abs() <= self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            angular: Self::DEFAULT_ANGULAR,
        }
    }
}

impl Validate for Tolerance {
    fn validate(&self) -> Result<()> {
        match [self.linear, self.angular]
            .into_iter()
            .find(|v| !(v.is_finite() && *v > 0.0))
        {
            Some(bad) => Err(CurveError::InvalidTolerance(bad)),
            None => Ok(()),
        }
    }
}

/// Tunables for building an arc-length parameterization.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArcLengthConfig {
    /// Largest allowed difference between the true arc length of a leaf and
    /// its estimate.
    pub max_error: f64,
    /// Bisection depth at which a sub-range is accepted regardless of its
    /// error bound.
    pub max_depth: u32,
}

impl ArcLengthConfig {
    pub const DEFAULT_MAX_DEPTH: u32 = 24;

    pub fn new(max_error: f64) -> Result<Self> {
        Self {
            max_error,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
        .validated()
    }

    pub fn with_max_depth(self, max_depth: u32) -> Self {
        Self { max_depth, ..self }
    }
}

impl Validate for ArcLengthConfig {
    fn validate(&self) -> Result<()> {
        if !(self.max_error.is_finite() && self.max_error > 0.0) {
            return Err(CurveError::InvalidTolerance(self.max_error));
        }
        Ok(())
    }
}
