//! Arc-length parameterization of nondegenerate curves.
//!
//! The parameter domain is bisected until, on every piece, the bounds on the
//! curve's speed pin the piece's length down to within `2·max_error`. Inside a
//! piece the parameter is interpolated linearly in arc length.

use curvekit_core::{ArcLengthConfig, CurveError, Result, Validate};
use curvekit_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::curve::ParametricCurve;
use crate::nondegenerate::Nondegenerate;

/// 5-point Gauss-Legendre nodes on `[-1, 1]` and their weights.
const GAUSS_NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683,
    0.0,
    0.538_469_310_105_683,
    0.906_179_845_938_664,
];
const GAUSS_WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189,
    0.478_628_670_499_366,
    0.568_888_888_888_889,
    0.478_628_670_499_366,
    0.236_926_885_056_189,
];

/// One piece of the parameterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub t0: f64,
    pub t1: f64,
    /// Arc length from the start of the curve to `t0`.
    pub start_length: f64,
    /// Estimated arc length from `t0` to `t1`.
    pub length: f64,
}

impl Leaf {
    pub fn end_length(&self) -> f64 {
        self.start_length + self.length
    }
}

/// Two-way mapping between a curve's parameter and distance travelled along it.
#[derive(Debug, Clone)]
pub struct ArcLengthParameterization<C> {
    curve: Nondegenerate<C>,
    config: ArcLengthConfig,
    leaves: Vec<Leaf>,
    length: f64,
}

fn speed_integral<C: ParametricCurve>(curve: &C, t0: f64, t1: f64) -> f64 {
    let half = 0.5 * (t1 - t0);
    let mid = 0.5 * (t0 + t1);
    GAUSS_NODES
        .iter()
        .zip(GAUSS_WEIGHTS)
        .map(|(&x, w)| w * curve.first_derivative(mid + half * x).length())
        .sum::<f64>()
        * half
}

impl<C: ParametricCurve> ArcLengthParameterization<C> {
    pub fn new(curve: Nondegenerate<C>, config: ArcLengthConfig) -> Result<Self> {
        config.validate()?;

        let inner = curve.curve();
        let mut stack = vec![(0.0, 1.0, 0u32)];
        let mut leaves = Vec::new();
        let mut total = 0.0;
        let mut forced = 0usize;

        while let Some((t0, t1, depth)) = stack.pop() {
            let width = t1 - t0;
            let speed = inner.speed_bounds(t0, t1);
            let (lower, upper) = (speed.min * width, speed.max * width);
            let settled = upper - lower <= 2.0 * config.max_error;
            if !settled && depth < config.max_depth {
                let mid = 0.5 * (t0 + t1);
                stack.push((mid, t1, depth + 1));
                stack.push((t0, mid, depth + 1));
                continue;
            }
            if !settled {
                forced += 1;
            }
            // Clamped into the certified bounds, so a settled leaf is off by at
            // most `upper - lower <= 2 * max_error`. Quadrature is far tighter in practice.
            let length = speed_integral(inner, t0, t1).max(lower).min(upper);
            trace!(t0, t1, length, depth, "arc-length leaf");
            leaves.push(Leaf {
                t0,
                t1,
                start_length: total,
                length,
            });
            total += length;
        }

        if forced > 0 {
            warn!(
                forced,
                max_depth = config.max_depth,
                "depth ceiling reached before arc-length bounds converged"
            );
        }
        debug!(
            leaves = leaves.len(),
            length = total,
            max_error = config.max_error,
            "built arc-length parameterization"
        );

        Ok(Self {
            curve,
            config,
            leaves,
            length: total,
        })
    }

    pub fn with_max_error(curve: Nondegenerate<C>, max_error: f64) -> Result<Self> {
        Self::new(curve, ArcLengthConfig::new(max_error)?)
    }

    pub fn curve(&self) -> &Nondegenerate<C> {
        &self.curve
    }

    pub fn config(&self) -> &ArcLengthConfig {
        &self.config
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Total length of the curve.
    pub fn arc_length(&self) -> f64 {
        self.length
    }

    /// Curve parameter at distance `s` from the start.
    ///
    /// Fails with [`CurveError::OutOfRangeArcLength`] unless `0 <= s <= arc_length()`.
    /// The endpoints map exactly to `0` and `1`.
    pub fn parameter_value(&self, s: f64) -> Result<f64> {
        if !(0.0..=self.length).contains(&s) {
            return Err(CurveError::OutOfRangeArcLength {
                value: s,
                length: self.length,
            });
        }
        if s == self.length {
            return Ok(1.0);
        }
        if s == 0.0 {
            return Ok(0.0);
        }
        let index = self
            .leaves
            .partition_point(|leaf| leaf.end_length() <= s)
            .min(self.leaves.len() - 1);
        let leaf = &self.leaves[index];
        let fraction = if leaf.length > 0.0 {
            ((s - leaf.start_length) / leaf.length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(leaf.t0 + fraction * (leaf.t1 - leaf.t0))
    }

    pub fn point_along(&self, s: f64) -> Result<Point2> {
        Ok(self.curve.curve().point_on(self.parameter_value(s)?))
    }

    /// Unit tangent at distance `s` from the start.
    pub fn tangent_along(&self, s: f64) -> Result<Vector2> {
        Ok(self.curve.tangent_direction(self.parameter_value(s)?))
    }

    /// Distance from the start of the curve to the point at parameter `t`.
    pub fn arc_length_at(&self, t: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&t) {
            return Err(CurveError::ParameterOutOfRange { value: t });
        }
        if t == 1.0 {
            return Ok(self.length);
        }
        let index = self
            .leaves
            .partition_point(|leaf| leaf.t1 <= t)
            .min(self.leaves.len() - 1);
        let leaf = &self.leaves[index];
        let fraction = (t - leaf.t0) / (leaf.t1 - leaf.t0);
        Ok(leaf.start_length + fraction * leaf.length)
    }

    /// `count + 1` points spaced evenly by arc length, including both endpoints.
    pub fn sample_evenly(&self, count: usize) -> Result<Vec<Point2>> {
        if count == 0 {
            return Err(CurveError::Geometry(
                "sample count must be positive".into(),
            ));
        }
        (0..=count)
            .map(|i| {
                let s = if i == count {
                    self.length
                } else {
                    self.length * (i as f64 / count as f64)
                };
                self.point_along(s)
            })
            .collect()
    }
}
