//! Polynomial Bezier splines.

use curvekit_core::{CurveError, Result};
use curvekit_math::{Aabb2, Point2, Transform2, Vector2, VectorBox2};
use serde::{Deserialize, Serialize};

use super::{ParametricCurve, Transformable};
use crate::bezier::{self, ROUNDING_SLACK};

/// Quadratic Bezier curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticSpline {
    control_points: [Point2; 3],
}

/// Cubic Bezier curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicSpline {
    control_points: [Point2; 4],
}

/// Bezier curve of any degree >= 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SplineDef")]
pub struct Spline {
    control_points: Vec<Point2>,
}

#[derive(Deserialize)]
struct SplineDef {
    control_points: Vec<Point2>,
}

impl TryFrom<SplineDef> for Spline {
    type Error = CurveError;

    fn try_from(def: SplineDef) -> Result<Self> {
        Self::new(def.control_points)
    }
}

impl QuadraticSpline {
    pub fn new(control_points: [Point2; 3]) -> Self {
        Self { control_points }
    }

    pub fn control_points(&self) -> &[Point2; 3] {
        &self.control_points
    }
}

impl CubicSpline {
    pub fn new(control_points: [Point2; 4]) -> Self {
        Self { control_points }
    }

    pub fn control_points(&self) -> &[Point2; 4] {
        &self.control_points
    }
}

impl Spline {
    /// Degree is one less than the number of control points, which must be at least two.
    pub fn new(control_points: Vec<Point2>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(CurveError::Geometry(format!(
                "a spline needs at least 2 control points, got {}",
                control_points.len()
            )));
        }
        Ok(Self { control_points })
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }
}

fn control_box(points: &[Point2]) -> Aabb2 {
    let slack = ROUNDING_SLACK * bezier::magnitude::<2, Point2>(points);
    Aabb2::from_points(points)
        .unwrap_or_else(|| Aabb2::new(Point2::ZERO, Point2::ZERO))
        .expand(slack)
}

fn second_derivative_at(points: &[Point2], t: f64) -> Vector2 {
    bezier::point(&bezier::derivative(&bezier::derivative(points)), t)
}

fn second_derivative_hull(points: &[Point2]) -> VectorBox2 {
    let second = bezier::derivative(&bezier::derivative(points));
    let scale = bezier::magnitude::<2, Point2>(&second);
    bezier::hull::<2, Point2>(&second, scale)
}

macro_rules! impl_polynomial {
    ($ty:ty, |$s:ident| $reversed:expr) => {
        impl ParametricCurve for $ty {
            fn start_point(&self) -> Point2 {
                self.control_points[0]
            }

            fn end_point(&self) -> Point2 {
                self.control_points[self.control_points.len() - 1]
            }

            fn point_on(&self, t: f64) -> Point2 {
                bezier::point(&self.control_points, t)
            }

            fn first_derivative(&self, t: f64) -> Vector2 {
                bezier::point(&bezier::derivative(&self.control_points), t)
            }

            fn second_derivative(&self, t: f64) -> Vector2 {
                second_derivative_at(&self.control_points, t)
            }

            fn bounding_box(&self) -> Aabb2 {
                control_box(&self.control_points)
            }

            fn derivative_bounds(&self, t0: f64, t1: f64) -> VectorBox2 {
                bezier::derivative_bounds::<2, Point2>(&self.control_points, t0, t1)
            }

            fn second_derivative_bounding_box(&self) -> VectorBox2 {
                second_derivative_hull(&self.control_points)
            }

            fn reverse(&self) -> Self {
                let $s = self;
                $reversed
            }
        }
    };
}

impl_polynomial!(QuadraticSpline, |s| {
    let [a, b, c] = s.control_points;
    QuadraticSpline::new([c, b, a])
});

impl_polynomial!(CubicSpline, |s| {
    let [a, b, c, d] = s.control_points;
    CubicSpline::new([d, c, b, a])
});

impl_polynomial!(Spline, |s| Spline {
    control_points: bezier::reversed(&s.control_points),
});

impl Transformable for QuadraticSpline {
    fn transform_by(&self, transform: &Transform2) -> Self {
        Self::new(self.control_points.map(|p| transform.transform_point(p)))
    }
}

impl Transformable for CubicSpline {
    fn transform_by(&self, transform: &Transform2) -> Self {
        Self::new(self.control_points.map(|p| transform.transform_point(p)))
    }
}

impl Transformable for Spline {
    fn transform_by(&self, transform: &Transform2) -> Self {
        Self {
            control_points: self
                .control_points
                .iter()
                .map(|&p| transform.transform_point(p))
                .collect(),
        }
    }
}
