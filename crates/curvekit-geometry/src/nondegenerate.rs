//! Curves proven to have a nonvanishing derivative.

use curvekit_core::{CurveError, Result, Tolerance, Validate};
use curvekit_math::Vector2;
use tracing::trace;

use crate::curve::ParametricCurve;

/// Bisection depth at which an unproven sub-range is settled by sampling.
const PROOF_DEPTH: u32 = 32;

/// A curve whose first derivative has been shown to stay away from zero on `[0, 1]`.
///
/// This is the only kind of curve the arc-length engine accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Nondegenerate<C> {
    curve: C,
}

impl<C: ParametricCurve> Nondegenerate<C> {
    pub fn new(curve: C) -> Result<Self> {
        Self::with_tolerance(curve, Tolerance::default())
    }

    /// Prove nondegeneracy by bisecting `[0, 1]` until the speed bounds of
    /// every piece exclude zero.
    ///
    /// A piece whose speed bounds collapse to zero fails immediately. A piece
    /// still unproven at the depth ceiling fails only if the sampled speed there
    /// is below `tolerance.linear`; slow but moving curves are accepted.
    pub fn with_tolerance(curve: C, tolerance: Tolerance) -> Result<Self> {
        tolerance.validate()?;
        let mut stack = vec![(0.0, 1.0, 0u32)];
        let mut pieces = 0usize;
        while let Some((t0, t1, depth)) = stack.pop() {
            pieces += 1;
            let speed = curve.speed_bounds(t0, t1);
            let mid = 0.5 * (t0 + t1);
            if speed.min.is_nan() || speed.max.is_nan() {
                return Err(CurveError::degenerate(mid, "speed is not a number"));
            }
            if speed.min > 0.0 {
                continue;
            }
            if speed.max <= 0.0 {
                return Err(CurveError::degenerate(
                    mid,
                    format!("derivative vanishes on [{t0}, {t1}]"),
                ));
            }
            if depth >= PROOF_DEPTH {
                let (t, slowest) = [t0, mid, t1]
                    .into_iter()
                    .map(|t| (t, curve.first_derivative(t).length()))
                    .fold((mid, f64::INFINITY), |acc, s| if s.1 < acc.1 { s } else { acc });
                if tolerance.is_standstill(slowest) {
                    return Err(CurveError::degenerate(
                        t,
                        format!("speed {slowest} is below tolerance {}", tolerance.linear),
                    ));
                }
                continue;
            }
            stack.push((mid, t1, depth + 1));
            stack.push((t0, mid, depth + 1));
        }
        trace!(pieces, "proved curve nondegenerate");
        Ok(Self { curve })
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn into_inner(self) -> C {
        self.curve
    }

    /// Unit tangent at `t`.
    pub fn tangent_direction(&self, t: f64) -> Vector2 {
        self.curve.first_derivative(t).normalize_or_zero()
    }
}
