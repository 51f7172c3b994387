//! Curve traits and the closed set of planar curve variants.

mod arc;
mod elliptical_arc;
mod rational;
mod spline;

use curvekit_core::{CurveError, Result};
use curvekit_math::{Aabb2, Axis2d, Frame2d, Interval, Point2, Transform2, Vector2, VectorBox2};
use serde::{Deserialize, Serialize};

pub use arc::Arc;
pub use elliptical_arc::EllipticalArc;
pub use rational::{RationalCubicSpline, RationalQuadraticSpline, RationalSpline};
pub use spline::{CubicSpline, QuadraticSpline, Spline};

/// A planar curve parameterized over `[0, 1]`.
pub trait ParametricCurve: Send + Sync {
    fn start_point(&self) -> Point2;

    fn end_point(&self) -> Point2;

    /// Evaluate the curve at `t`. Returns the stored endpoints exactly at
    /// `t = 0` and `t = 1`.
    fn point_on(&self, t: f64) -> Point2;

    fn first_derivative(&self, t: f64) -> Vector2;

    fn second_derivative(&self, t: f64) -> Vector2;

    /// Box containing `point_on(t)` for every `t` in `[0, 1]`.
    fn bounding_box(&self) -> Aabb2;

    /// Box containing `first_derivative(t)` for every `t` in `[t0, t1]`.
    fn derivative_bounds(&self, t0: f64, t1: f64) -> VectorBox2;

    fn first_derivative_bounding_box(&self) -> VectorBox2 {
        self.derivative_bounds(0.0, 1.0)
    }

    /// Box containing `second_derivative(t)` for every `t` in `[0, 1]`.
    fn second_derivative_bounding_box(&self) -> VectorBox2;

    /// Enclosure of the speed `|first_derivative(t)|` over `[t0, t1]`.
    fn speed_bounds(&self, t0: f64, t1: f64) -> Interval {
        self.derivative_bounds(t0, t1).length()
    }

    /// Number of straight segments needed to stay within `tolerance` of the
    /// curve when sampling at uniform parameter steps.
    fn num_approximation_segments(&self, tolerance: f64) -> Result<usize> {
        check_tolerance(tolerance)?;
        let curvature = self.second_derivative_bounding_box().length().max;
        segments_for_second_derivative(curvature, tolerance)
    }

    /// The same curve traversed from end to start.
    fn reverse(&self) -> Self
    where
        Self: Sized;
}

/// Similarity transforms applied to a curve, producing a curve of the same kind.
pub trait Transformable: Sized {
    fn transform_by(&self, transform: &Transform2) -> Self;

    fn translate_by(&self, displacement: Vector2) -> Self {
        self.transform_by(&Transform2::translation(displacement))
    }

    fn rotate_around(&self, center: Point2, angle: f64) -> Self {
        self.transform_by(&Transform2::rotation_around(center, angle))
    }

    fn scale_about(&self, center: Point2, factor: f64) -> Self {
        self.transform_by(&Transform2::scaling_about(center, factor))
    }

    fn mirror_across(&self, axis: &Axis2d) -> Self {
        self.transform_by(&Transform2::mirror_across(axis))
    }

    /// Treat the curve's coordinates as local to `frame` and express it globally.
    fn place_in(&self, frame: &Frame2d) -> Self {
        self.transform_by(&Transform2::placement(frame))
    }

    /// Express the curve in coordinates local to `frame`. Inverse of [`place_in`](Self::place_in).
    fn relative_to(&self, frame: &Frame2d) -> Self {
        self.transform_by(&Transform2::relative_to(frame))
    }
}

pub(crate) fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(())
    } else {
        Err(CurveError::InvalidTolerance(tolerance))
    }
}

/// Chord count for a curve whose second derivative is at most `bound`:
/// the chord deviation over a step `h` is at most `bound·h²/8`.
pub(crate) fn segments_for_second_derivative(bound: f64, tolerance: f64) -> Result<usize> {
    if !bound.is_finite() {
        return Err(CurveError::Geometry(
            "second derivative is unbounded".into(),
        ));
    }
    let count = (bound / (8.0 * tolerance)).sqrt().ceil();
    Ok((count as usize).max(1))
}

/// Any supported planar curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    Arc(Arc),
    EllipticalArc(EllipticalArc),
    Quadratic(QuadraticSpline),
    Cubic(CubicSpline),
    Spline(Spline),
    RationalQuadratic(RationalQuadraticSpline),
    RationalCubic(RationalCubicSpline),
    RationalSpline(RationalSpline),
}

/// Run `$body` with `$c` bound to the variant inside `$curve`.
macro_rules! dispatch {
    ($curve:expr, $c:ident => $body:expr) => {
        match $curve {
            Curve::Arc($c) => $body,
            Curve::EllipticalArc($c) => $body,
            Curve::Quadratic($c) => $body,
            Curve::Cubic($c) => $body,
            Curve::Spline($c) => $body,
            Curve::RationalQuadratic($c) => $body,
            Curve::RationalCubic($c) => $body,
            Curve::RationalSpline($c) => $body,
        }
    };
}

/// Like `dispatch!`, but wraps the result back into the same variant.
macro_rules! map_variant {
    ($curve:expr, $c:ident => $body:expr) => {
        match $curve {
            Curve::Arc($c) => Curve::Arc($body),
            Curve::EllipticalArc($c) => Curve::EllipticalArc($body),
            Curve::Quadratic($c) => Curve::Quadratic($body),
            Curve::Cubic($c) => Curve::Cubic($body),
            Curve::Spline($c) => Curve::Spline($body),
            Curve::RationalQuadratic($c) => Curve::RationalQuadratic($body),
            Curve::RationalCubic($c) => Curve::RationalCubic($body),
            Curve::RationalSpline($c) => Curve::RationalSpline($body),
        }
    };
}

impl Curve {
    /// Short name of the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Curve::Arc(_) => "arc",
            Curve::EllipticalArc(_) => "elliptical arc",
            Curve::Quadratic(_) => "quadratic spline",
            Curve::Cubic(_) => "cubic spline",
            Curve::Spline(_) => "spline",
            Curve::RationalQuadratic(_) => "rational quadratic spline",
            Curve::RationalCubic(_) => "rational cubic spline",
            Curve::RationalSpline(_) => "rational spline",
        }
    }
}

impl ParametricCurve for Curve {
    fn start_point(&self) -> Point2 {
        dispatch!(self, c => c.start_point())
    }

    fn end_point(&self) -> Point2 {
        dispatch!(self, c => c.end_point())
    }

    fn point_on(&self, t: f64) -> Point2 {
        dispatch!(self, c => c.point_on(t))
    }

    fn first_derivative(&self, t: f64) -> Vector2 {
        dispatch!(self, c => c.first_derivative(t))
    }

    fn second_derivative(&self, t: f64) -> Vector2 {
        dispatch!(self, c => c.second_derivative(t))
    }

    fn bounding_box(&self) -> Aabb2 {
        dispatch!(self, c => c.bounding_box())
    }

    fn derivative_bounds(&self, t0: f64, t1: f64) -> VectorBox2 {
        dispatch!(self, c => c.derivative_bounds(t0, t1))
    }

    fn second_derivative_bounding_box(&self) -> VectorBox2 {
        dispatch!(self, c => c.second_derivative_bounding_box())
    }

    fn speed_bounds(&self, t0: f64, t1: f64) -> Interval {
        dispatch!(self, c => c.speed_bounds(t0, t1))
    }

    fn num_approximation_segments(&self, tolerance: f64) -> Result<usize> {
        dispatch!(self, c => c.num_approximation_segments(tolerance))
    }

    fn reverse(&self) -> Self {
        map_variant!(self, c => c.reverse())
    }
}

impl Transformable for Curve {
    fn transform_by(&self, transform: &Transform2) -> Self {
        map_variant!(self, c => c.transform_by(transform))
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Curve {
                fn from(curve: $ty) -> Self {
                    Curve::$variant(curve)
                }
            }
        )*
    };
}

impl_from_variant!(
    Arc(Arc),
    EllipticalArc(EllipticalArc),
    Quadratic(QuadraticSpline),
    Cubic(CubicSpline),
    Spline(Spline),
    RationalQuadratic(RationalQuadraticSpline),
    RationalCubic(RationalCubicSpline),
    RationalSpline(RationalSpline),
);

#[cfg(test)]
mod tests {
    use super::*;
    use curvekit_math::dvec2;

    #[test]
    fn test_enum_dispatch_matches_variant() {
        let spline = QuadraticSpline::new([dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(2.0, 0.0)]);
        let curve = Curve::from(spline.clone());
        assert_eq!(curve.kind(), "quadratic spline");
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert_eq!(curve.point_on(t), spline.point_on(t));
            assert_eq!(curve.first_derivative(t), spline.first_derivative(t));
        }
        assert_eq!(curve.reverse(), Curve::Quadratic(spline.reverse()));
    }

    #[test]
    fn test_segments_for_second_derivative() {
        assert_eq!(segments_for_second_derivative(0.0, 0.1).unwrap(), 1);
        assert_eq!(segments_for_second_derivative(800.0, 1.0).unwrap(), 10);
        assert_eq!(segments_for_second_derivative(801.0, 1.0).unwrap(), 11);
        assert!(segments_for_second_derivative(f64::INFINITY, 0.1).is_err());
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        let curve = Curve::from(Arc::new(Point2::ZERO, 1.0, 0.0, 1.0).unwrap());
        assert_eq!(
            curve.num_approximation_segments(0.0),
            Err(CurveError::InvalidTolerance(0.0))
        );
        assert!(curve.num_approximation_segments(f64::NAN).is_err());
    }

    #[test]
    fn test_curve_serde_round_trip() {
        let curve = Curve::from(CubicSpline::new([
            dvec2(0.0, 0.0),
            dvec2(1.0, 1.0),
            dvec2(2.0, -1.0),
            dvec2(3.0, 0.0),
        ]));
        let json = serde_json::to_string(&curve).unwrap();
        let back: Curve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
    }
}
