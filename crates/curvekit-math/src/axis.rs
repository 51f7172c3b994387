use crate::{Point2, Vector2};
use curvekit_core::{CurveError, Result};
use serde::{Deserialize, Serialize};

/// An infinite directed line in the plane, used as a mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis2d {
    pub origin: Point2,
    pub direction: Vector2,
}

impl Axis2d {
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let direction = direction
            .try_normalize()
            .ok_or_else(|| CurveError::Geometry("axis direction has zero length".into()))?;
        Ok(Self { origin, direction })
    }

    pub fn x() -> Self {
        Self {
            origin: Point2::ZERO,
            direction: Vector2::X,
        }
    }

    pub fn y() -> Self {
        Self {
            origin: Point2::ZERO,
            direction: Vector2::Y,
        }
    }

    /// Get a point along the axis at signed distance `t` from the origin.
    pub fn at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }

    /// Orthogonal projection of a point onto the axis.
    pub fn project_point(&self, point: Point2) -> Point2 {
        self.at((point - self.origin).dot(self.direction))
    }

    /// Signed distance from the axis; positive on the left.
    pub fn signed_distance(&self, point: Point2) -> f64 {
        self.direction.perp_dot(point - self.origin)
    }
}
