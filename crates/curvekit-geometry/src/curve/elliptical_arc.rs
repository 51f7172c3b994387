//! Elliptical arc.

use curvekit_core::{CurveError, Result};
use curvekit_math::{Aabb2, Frame2d, Interval, Point2, Transform2, Vector2, VectorBox2};
use serde::{Deserialize, Serialize};

use super::{ParametricCurve, Transformable};
use crate::bezier::ROUNDING_SLACK;

/// An arc of an ellipse whose principal axes are the directions of `axes`.
///
/// In local coordinates the point at angle `θ` is `(x_radius·cos θ, y_radius·sin θ)`,
/// with `θ` running uniformly from `start_angle` to `start_angle + sweep_angle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipticalArc {
    axes: Frame2d,
    x_radius: f64,
    y_radius: f64,
    start_angle: f64,
    sweep_angle: f64,
    start: Point2,
    end: Point2,
}

/// Map a box of local vectors through the frame's directions.
fn to_global(frame: &Frame2d, local: &VectorBox2) -> VectorBox2 {
    let (x, y) = (frame.x_direction, frame.y_direction);
    VectorBox2::new([
        local.x() * x.x + local.y() * y.x,
        local.x() * x.y + local.y() * y.y,
    ])
}

impl EllipticalArc {
    pub fn new(
        axes: Frame2d,
        x_radius: f64,
        y_radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Result<Self> {
        let positive = |r: f64| r.is_finite() && r > 0.0;
        if !(positive(x_radius) && positive(y_radius)) {
            return Err(CurveError::Geometry(format!(
                "ellipse radii must be positive, got {x_radius} and {y_radius}"
            )));
        }
        if !(start_angle.is_finite() && sweep_angle.is_finite()) {
            return Err(CurveError::Geometry("arc angles must be finite".into()));
        }
        let mut arc = Self {
            axes,
            x_radius,
            y_radius,
            start_angle,
            sweep_angle,
            start: Point2::ZERO,
            end: Point2::ZERO,
        };
        arc.start = arc.evaluate(start_angle);
        arc.end = arc.evaluate(start_angle + sweep_angle);
        Ok(arc)
    }

    pub fn axes(&self) -> &Frame2d {
        &self.axes
    }

    pub fn center(&self) -> Point2 {
        self.axes.origin
    }

    pub fn x_radius(&self) -> f64 {
        self.x_radius
    }

    pub fn y_radius(&self) -> f64 {
        self.y_radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn sweep_angle(&self) -> f64 {
        self.sweep_angle
    }

    fn evaluate(&self, angle: f64) -> Point2 {
        self.axes.point_to_global(Vector2::new(
            self.x_radius * angle.cos(),
            self.y_radius * angle.sin(),
        ))
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep_angle * t
    }

    fn trig_bounds(&self, t0: f64, t1: f64) -> (Interval, Interval) {
        let angles = Interval::new(self.angle_at(t0), self.angle_at(t1));
        (
            angles.cos().widen(ROUNDING_SLACK),
            angles.sin().widen(ROUNDING_SLACK),
        )
    }

    fn padded(&self, b: VectorBox2) -> VectorBox2 {
        b.widen(ROUNDING_SLACK * b.magnitude())
    }
}

impl ParametricCurve for EllipticalArc {
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
        self.evaluate(self.angle_at(t))
    }

    fn first_derivative(&self, t: f64) -> Vector2 {
        let angle = self.angle_at(t);
        self.axes.vector_to_global(
            self.sweep_angle
                * Vector2::new(-self.x_radius * angle.sin(), self.y_radius * angle.cos()),
        )
    }

    fn second_derivative(&self, t: f64) -> Vector2 {
        let angle = self.angle_at(t);
        self.axes.vector_to_global(
            -self.sweep_angle
                * self.sweep_angle
                * Vector2::new(self.x_radius * angle.cos(), self.y_radius * angle.sin()),
        )
    }

    fn bounding_box(&self) -> Aabb2 {
        let (cos, sin) = self.trig_bounds(0.0, 1.0);
        let offsets = to_global(
            &self.axes,
            &VectorBox2::new([cos * self.x_radius, sin * self.y_radius]),
        );
        Aabb2::around(self.center(), &self.padded(offsets))
            .merge(&Aabb2::new(self.start.min(self.end), self.start.max(self.end)))
    }

    fn derivative_bounds(&self, t0: f64, t1: f64) -> VectorBox2 {
        let (cos, sin) = self.trig_bounds(t0, t1);
        let local = VectorBox2::new([sin * -self.x_radius, cos * self.y_radius])
            .multiply_by(self.sweep_angle);
        self.padded(to_global(&self.axes, &local))
    }

    fn second_derivative_bounding_box(&self) -> VectorBox2 {
        let (cos, sin) = self.trig_bounds(0.0, 1.0);
        let local = VectorBox2::new([cos * self.x_radius, sin * self.y_radius])
            .multiply_by(-self.sweep_angle * self.sweep_angle);
        self.padded(to_global(&self.axes, &local))
    }

    fn reverse(&self) -> Self {
        Self {
            start_angle: self.start_angle + self.sweep_angle,
            sweep_angle: -self.sweep_angle,
            start: self.end,
            end: self.start,
            ..self.clone()
        }
    }
}

impl Transformable for EllipticalArc {
    fn transform_by(&self, transform: &Transform2) -> Self {
        let scale = transform.scale_factor();
        let direction = |v: Vector2| {
            if scale > 0.0 {
                transform.transform_vector(v) / scale
            } else {
                v
            }
        };
        Self {
            axes: Frame2d {
                origin: transform.transform_point(self.axes.origin),
                x_direction: direction(self.axes.x_direction),
                y_direction: direction(self.axes.y_direction),
            },
            x_radius: self.x_radius * scale,
            y_radius: self.y_radius * scale,
            start_angle: self.start_angle,
            sweep_angle: self.sweep_angle,
            start: transform.transform_point(self.start),
            end: transform.transform_point(self.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvekit_math::dvec2;
    use std::f64::consts::PI;

    fn sample() -> EllipticalArc {
        let axes = Frame2d::new(dvec2(1.0, 2.0), dvec2(1.0, 1.0)).unwrap();
        EllipticalArc::new(axes, 3.0, 1.0, 0.2, 1.5 * PI).unwrap()
    }

    #[test]
    fn test_points_satisfy_ellipse_equation() {
        let arc = sample();
        for i in 0..=20 {
            let local = arc.axes().point_to_local(arc.point_on(i as f64 / 20.0));
            let value = (local.x / 3.0).powi(2) + local.y.powi(2);
            assert!((value - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let arc = sample();
        let h = 1e-6;
        for &t in &[0.1, 0.5, 0.9] {
            let fd = (arc.point_on(t + h) - arc.point_on(t - h)) / (2.0 * h);
            assert!((arc.first_derivative(t) - fd).length() < 1e-5);
            let fd2 = (arc.first_derivative(t + h) - arc.first_derivative(t - h)) / (2.0 * h);
            assert!((arc.second_derivative(t) - fd2).length() < 1e-4);
        }
    }

    #[test]
    fn test_bounding_box_contains_samples() {
        let arc = sample();
        let bbox = arc.bounding_box();
        for i in 0..=100 {
            assert!(bbox.contains_point(arc.point_on(i as f64 / 100.0)));
        }
    }

    #[test]
    fn test_scale_keeps_shape() {
        let arc = sample();
        let scaled = arc.scale_about(dvec2(-1.0, 0.5), -2.0);
        assert!((scaled.x_radius() - 6.0).abs() < 1e-12);
        let t = Transform2::scaling_about(dvec2(-1.0, 0.5), -2.0);
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            assert!((scaled.point_on(u) - t.transform_point(arc.point_on(u))).length() < 1e-11);
        }
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert!(EllipticalArc::new(Frame2d::xy(), 0.0, 1.0, 0.0, 1.0).is_err());
        assert!(EllipticalArc::new(Frame2d::xy(), 1.0, f64::INFINITY, 0.0, 1.0).is_err());
    }
}
