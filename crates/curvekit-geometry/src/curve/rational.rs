//! Rational (weighted) Bezier splines.
//!
//! Evaluation runs on homogeneous control points `(w·x, w·y, w)` and projects
//! back to the plane. With positive weights the curve stays inside the convex
//! hull of its control points, which is what the bounding boxes rely on.

use std::f64::consts::PI;

use curvekit_core::{CurveError, Result, Tolerance};
use curvekit_math::{
    Aabb2, DVec3, Homogeneous2, Interval, Point2, Transform2, Vector2, VectorBox2, VectorBox3,
};
use serde::{Deserialize, Serialize};

use super::{Arc, ParametricCurve, Transformable};
use crate::bezier::{self, ROUNDING_SLACK};

/// Rational quadratic Bezier curve; represents conic sections exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightedDef<[Point2; 3], [f64; 3]>")]
pub struct RationalQuadraticSpline {
    control_points: [Point2; 3],
    weights: [f64; 3],
}

/// Rational cubic Bezier curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightedDef<[Point2; 4], [f64; 4]>")]
pub struct RationalCubicSpline {
    control_points: [Point2; 4],
    weights: [f64; 4],
}

/// Rational Bezier curve of any degree >= 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightedDef<Vec<Point2>, Vec<f64>>")]
pub struct RationalSpline {
    control_points: Vec<Point2>,
    weights: Vec<f64>,
}

/// Serialized shape shared by the rational splines, checked on the way in.
#[derive(Deserialize)]
struct WeightedDef<P, W> {
    control_points: P,
    weights: W,
}

impl TryFrom<WeightedDef<[Point2; 3], [f64; 3]>> for RationalQuadraticSpline {
    type Error = CurveError;

    fn try_from(def: WeightedDef<[Point2; 3], [f64; 3]>) -> Result<Self> {
        Self::new(def.control_points, def.weights)
    }
}

impl TryFrom<WeightedDef<[Point2; 4], [f64; 4]>> for RationalCubicSpline {
    type Error = CurveError;

    fn try_from(def: WeightedDef<[Point2; 4], [f64; 4]>) -> Result<Self> {
        Self::new(def.control_points, def.weights)
    }
}

impl TryFrom<WeightedDef<Vec<Point2>, Vec<f64>>> for RationalSpline {
    type Error = CurveError;

    fn try_from(def: WeightedDef<Vec<Point2>, Vec<f64>>) -> Result<Self> {
        Self::new(def.control_points, def.weights)
    }
}

fn check_weights(weights: &[f64]) -> Result<()> {
    match weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
        Some(i) => Err(CurveError::Geometry(format!(
            "weight {} at index {} is not positive",
            weights[i], i
        ))),
        None => Ok(()),
    }
}

impl RationalQuadraticSpline {
    pub fn new(control_points: [Point2; 3], weights: [f64; 3]) -> Result<Self> {
        check_weights(&weights)?;
        Ok(Self {
            control_points,
            weights,
        })
    }

    /// Exact conic representation of a circular arc sweeping less than half a turn.
    ///
    /// The parameterization differs from the arc's (it is not uniform in
    /// angle) but every point lies on the arc's circle.
    pub fn circular_arc(arc: &Arc) -> Result<Self> {
        let half = 0.5 * arc.sweep_angle();
        let tolerance = Tolerance::default();
        if tolerance.is_negligible_angle(half) || !(half.abs() < 0.5 * PI - tolerance.angular) {
            return Err(CurveError::Geometry(format!(
                "conic arc needs a nonzero sweep strictly inside (-pi, pi), got {}",
                arc.sweep_angle()
            )));
        }
        let mid_angle = arc.start_angle() + half;
        let apex = arc.center()
            + arc.radius() / half.cos() * Vector2::new(mid_angle.cos(), mid_angle.sin());
        Self::new(
            [arc.start_point(), apex, arc.end_point()],
            [1.0, half.cos(), 1.0],
        )
    }

    pub fn control_points(&self) -> &[Point2; 3] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64; 3] {
        &self.weights
    }
}

impl RationalCubicSpline {
    pub fn new(control_points: [Point2; 4], weights: [f64; 4]) -> Result<Self> {
        check_weights(&weights)?;
        Ok(Self {
            control_points,
            weights,
        })
    }

    pub fn control_points(&self) -> &[Point2; 4] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64; 4] {
        &self.weights
    }
}

impl RationalSpline {
    pub fn new(control_points: Vec<Point2>, weights: Vec<f64>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(CurveError::Geometry(format!(
                "a spline needs at least 2 control points, got {}",
                control_points.len()
            )));
        }
        if weights.len() != control_points.len() {
            return Err(CurveError::Geometry(format!(
                "{} weights given for {} control points",
                weights.len(),
                control_points.len()
            )));
        }
        check_weights(&weights)?;
        Ok(Self {
            control_points,
            weights,
        })
    }

    /// Build from homogeneous points `(w·x, w·y, w)`.
    pub fn from_homogeneous(points: &[Homogeneous2]) -> Result<Self> {
        Self::new(
            points.iter().map(|&h| project(h)).collect(),
            points.iter().map(|h| h.z).collect(),
        )
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

pub(crate) fn project(h: Homogeneous2) -> Point2 {
    h.truncate() / h.z
}

fn homogeneous(points: &[Point2], weights: &[f64]) -> Vec<Homogeneous2> {
    points
        .iter()
        .zip(weights)
        .map(|(&p, &w)| (p * w).extend(w))
        .collect()
}

fn point_at(points: &[Point2], weights: &[f64], t: f64) -> Point2 {
    if t == 0.0 {
        return points[0];
    }
    if t == 1.0 {
        return points[points.len() - 1];
    }
    project(bezier::point(&homogeneous(points, weights), t))
}

/// Position and first derivative from the homogeneous curve and its hodograph.
fn first_derivative_at(h: &[Homogeneous2], t: f64) -> (Point2, Vector2) {
    let p = bezier::point(h, t);
    let dp = bezier::point(&bezier::derivative(h), t);
    let c = p.truncate() / p.z;
    (c, (dp.truncate() - dp.z * c) / p.z)
}

fn second_derivative_at(h: &[Homogeneous2], t: f64) -> Vector2 {
    let p = bezier::point(h, t);
    let ddp = bezier::point(&bezier::derivative(&bezier::derivative(h)), t);
    let (c, dc) = first_derivative_at(h, t);
    (ddp.truncate() - 2.0 * bezier::point(&bezier::derivative(h), t).z * dc - ddp.z * c) / p.z
}

fn planar_part(b: &VectorBox3) -> VectorBox2 {
    VectorBox2::new([b.component(0), b.component(1)])
}

/// Box around the projected control points.
fn position_hull(h: &[Homogeneous2]) -> VectorBox2 {
    let projected: Vec<Point2> = h.iter().map(|&p| project(p)).collect();
    let scale = bezier::magnitude::<2, Point2>(&projected);
    bezier::hull::<2, Point2>(&projected, scale)
}

fn weight_hull(h: &[Homogeneous2]) -> Interval {
    let hull = Interval::hull_of(h.iter().map(|p| p.z)).unwrap_or(Interval::ZERO);
    hull.widen_relative(ROUNDING_SLACK)
}

fn tangent_hull(h: &[Homogeneous2], t0: f64, t1: f64) -> VectorBox3 {
    let hodograph = bezier::derivative(h);
    let scale = bezier::magnitude::<3, DVec3>(&hodograph);
    bezier::hull::<3, DVec3>(&bezier::sub_segment(&hodograph, t0, t1), scale)
}

fn padded(b: VectorBox2) -> VectorBox2 {
    b.widen(ROUNDING_SLACK * b.magnitude())
}

/// `C' = (H'xy - w'·C) / w` evaluated over boxes.
fn derivative_bounds(h: &[Homogeneous2], t0: f64, t1: f64) -> VectorBox2 {
    let sub = bezier::sub_segment(h, t0, t1);
    let position = position_hull(&sub);
    let weight = weight_hull(&sub);
    let tangent = tangent_hull(h, t0, t1);
    padded(
        planar_part(&tangent)
            .minus(&position.times(tangent.component(2)))
            .divided_by(weight),
    )
}

/// `C'' = (H''xy - 2w'·C' - w''·C) / w` evaluated over boxes on `[0, 1]`.
fn second_derivative_bounds(h: &[Homogeneous2]) -> VectorBox2 {
    let second = bezier::derivative(&bezier::derivative(h));
    let scale = bezier::magnitude::<3, DVec3>(&second);
    let curvature = bezier::hull::<3, DVec3>(&second, scale);
    let tangent = tangent_hull(h, 0.0, 1.0);
    let velocity = derivative_bounds(h, 0.0, 1.0);
    let position = position_hull(h);
    padded(
        planar_part(&curvature)
            .minus(&velocity.times(tangent.component(2)).twice())
            .minus(&position.times(curvature.component(2)))
            .divided_by(weight_hull(h)),
    )
}

fn control_box(points: &[Point2]) -> Aabb2 {
    let slack = ROUNDING_SLACK * bezier::magnitude::<2, Point2>(points);
    Aabb2::from_points(points)
        .unwrap_or_else(|| Aabb2::new(Point2::ZERO, Point2::ZERO))
        .expand(slack)
}

macro_rules! impl_rational {
    ($ty:ty, |$s:ident| $reversed:expr) => {
        impl ParametricCurve for $ty {
            fn start_point(&self) -> Point2 {
                self.control_points[0]
            }

            fn end_point(&self) -> Point2 {
                self.control_points[self.control_points.len() - 1]
            }

            fn point_on(&self, t: f64) -> Point2 {
                point_at(&self.control_points, &self.weights, t)
            }

            fn first_derivative(&self, t: f64) -> Vector2 {
                first_derivative_at(&homogeneous(&self.control_points, &self.weights), t).1
            }

            fn second_derivative(&self, t: f64) -> Vector2 {
                second_derivative_at(&homogeneous(&self.control_points, &self.weights), t)
            }

            fn bounding_box(&self) -> Aabb2 {
                control_box(&self.control_points)
            }

            fn derivative_bounds(&self, t0: f64, t1: f64) -> VectorBox2 {
                derivative_bounds(&homogeneous(&self.control_points, &self.weights), t0, t1)
            }

            fn second_derivative_bounding_box(&self) -> VectorBox2 {
                second_derivative_bounds(&homogeneous(&self.control_points, &self.weights))
            }

            fn reverse(&self) -> Self {
                let $s = self;
                $reversed
            }
        }
    };
}

impl_rational!(RationalQuadraticSpline, |s| {
    let ([a, b, c], [wa, wb, wc]) = (s.control_points, s.weights);
    RationalQuadraticSpline {
        control_points: [c, b, a],
        weights: [wc, wb, wa],
    }
});

impl_rational!(RationalCubicSpline, |s| {
    let ([a, b, c, d], [wa, wb, wc, wd]) = (s.control_points, s.weights);
    RationalCubicSpline {
        control_points: [d, c, b, a],
        weights: [wd, wc, wb, wa],
    }
});

impl_rational!(RationalSpline, |s| RationalSpline {
    control_points: bezier::reversed(&s.control_points),
    weights: bezier::reversed(&s.weights),
});

impl Transformable for RationalQuadraticSpline {
    fn transform_by(&self, transform: &Transform2) -> Self {
        Self {
            control_points: self.control_points.map(|p| transform.transform_point(p)),
            weights: self.weights,
        }
    }
}

impl Transformable for RationalCubicSpline {
    fn transform_by(&self, transform: &Transform2) -> Self {
        Self {
            control_points: self.control_points.map(|p| transform.transform_point(p)),
            weights: self.weights,
        }
    }
}

impl Transformable for RationalSpline {
    fn transform_by(&self, transform: &Transform2) -> Self {
        Self {
            control_points: self
                .control_points
                .iter()
                .map(|&p| transform.transform_point(p))
                .collect(),
            weights: self.weights.clone(),
        }
    }
}
