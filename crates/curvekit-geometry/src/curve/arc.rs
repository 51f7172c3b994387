//! Circular arc.

use std::f64::consts::TAU;

use curvekit_core::{CurveError, Result};
use curvekit_math::{Aabb2, Interval, Point2, Transform2, Vector2, VectorBox2};
use serde::{Deserialize, Serialize};

use super::{check_tolerance, ParametricCurve, Transformable};
use crate::bezier::ROUNDING_SLACK;

/// A circular arc, parameterized so that `t` sweeps the angle uniformly from
/// `start_angle` to `start_angle + sweep_angle`.
///
/// A positive sweep runs counterclockwise. The endpoints are stored so that
/// evaluation at `t = 0` and `t = 1` reproduces them exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    sweep_angle: f64,
    start: Point2,
    end: Point2,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep_angle: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CurveError::Geometry(format!(
                "arc radius must be positive, got {radius}"
            )));
        }
        if !(start_angle.is_finite() && sweep_angle.is_finite()) {
            return Err(CurveError::Geometry("arc angles must be finite".into()));
        }
        let at = |angle: f64| center + radius * Vector2::new(angle.cos(), angle.sin());
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep_angle,
            start: at(start_angle),
            end: at(start_angle + sweep_angle),
        })
    }

    /// Arc from `start` to `end` turning through `sweep_angle` (counterclockwise
    /// when positive). The sweep must be nonzero and less than a full turn.
    pub fn from_endpoints(start: Point2, end: Point2, sweep_angle: f64) -> Result<Self> {
        if !(sweep_angle.abs() < TAU) || sweep_angle == 0.0 {
            return Err(CurveError::Geometry(format!(
                "sweep angle must be nonzero and within a full turn, got {sweep_angle}"
            )));
        }
        let chord = end - start;
        let length = chord.length();
        if length == 0.0 || !length.is_finite() {
            return Err(CurveError::Geometry(
                "arc endpoints must be distinct".into(),
            ));
        }
        let half = 0.5 * sweep_angle;
        let direction = chord / length;
        let center = start.lerp(end, 0.5) + direction.perp() * (0.5 * length / half.tan());
        let radius = 0.5 * length / half.sin().abs();
        let offset = start - center;
        Ok(Self {
            center,
            radius,
            start_angle: offset.y.atan2(offset.x),
            sweep_angle,
            start,
            end,
        })
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn sweep_angle(&self) -> f64 {
        self.sweep_angle
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep_angle * t
    }

    fn angle_range(&self, t0: f64, t1: f64) -> Interval {
        Interval::new(self.angle_at(t0), self.angle_at(t1))
    }

    /// `(cos θ, sin θ)` over the angles swept between `t0` and `t1`.
    fn unit_circle_bounds(&self, t0: f64, t1: f64) -> VectorBox2 {
        let angles = self.angle_range(t0, t1);
        VectorBox2::new([angles.cos(), angles.sin()]).widen(ROUNDING_SLACK)
    }
}

impl ParametricCurve for Arc {
    fn start_point(&self) -> Point2 {
        self.start
    }

    fn end_point(&self) -> Point2 {
        self.end
    }

    fn point_on(&self, t: f64) -> Point2 {
        if t == 0.0 {
            return self.start;
        }
        if t == 1.0 {
            return self.end;
        }
        let angle = self.angle_at(t);
        self.center + self.radius * Vector2::new(angle.cos(), angle.sin())
    }

    fn first_derivative(&self, t: f64) -> Vector2 {
        let angle = self.angle_at(t);
        self.radius * self.sweep_angle * Vector2::new(-angle.sin(), angle.cos())
    }

    fn second_derivative(&self, t: f64) -> Vector2 {
        let angle = self.angle_at(t);
        -self.radius * self.sweep_angle * self.sweep_angle * Vector2::new(angle.cos(), angle.sin())
    }

    fn bounding_box(&self) -> Aabb2 {
        let swept = Aabb2::around(
            self.center,
            &self.unit_circle_bounds(0.0, 1.0).multiply_by(self.radius),
        );
        swept.merge(&Aabb2::new(self.start.min(self.end), self.start.max(self.end)))
    }

    fn derivative_bounds(&self, t0: f64, t1: f64) -> VectorBox2 {
        let unit = self.unit_circle_bounds(t0, t1);
        // (-sin, cos) rotated a quarter turn from (cos, sin)
        VectorBox2::new([-unit.y(), unit.x()]).multiply_by(self.radius * self.sweep_angle)
    }

    fn second_derivative_bounding_box(&self) -> VectorBox2 {
        self.unit_circle_bounds(0.0, 1.0)
            .multiply_by(-self.radius * self.sweep_angle * self.sweep_angle)
    }

    /// Arcs move at the constant speed `radius·|sweep|`.
    fn speed_bounds(&self, _t0: f64, _t1: f64) -> Interval {
        Interval::singleton(self.radius * self.sweep_angle.abs())
    }

    fn num_approximation_segments(&self, tolerance: f64) -> Result<usize> {
        check_tolerance(tolerance)?;
        if tolerance >= self.radius {
            return Ok(1);
        }
        let step = 2.0 * (1.0 - tolerance / self.radius).acos();
        Ok(((self.sweep_angle.abs() / step).ceil() as usize).max(1))
    }

    fn reverse(&self) -> Self {
        Self {
            start_angle: self.start_angle + self.sweep_angle,
            sweep_angle: -self.sweep_angle,
            start: self.end,
            end: self.start,
            ..*self
        }
    }
}

impl Transformable for Arc {
    fn transform_by(&self, transform: &Transform2) -> Self {
        let center = transform.transform_point(self.center);
        let start = transform.transform_point(self.start);
        let offset = start - center;
        let sweep_angle = if transform.is_orientation_reversing() {
            -self.sweep_angle
        } else {
            self.sweep_angle
        };
        Self {
            center,
            radius: self.radius * transform.scale_factor(),
            start_angle: offset.y.atan2(offset.x),
            sweep_angle,
            start,
            end: transform.transform_point(self.end),
        }
    }
}
