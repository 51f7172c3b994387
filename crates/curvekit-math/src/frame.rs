use crate::{Axis2d, Point2, Vector2};
use curvekit_core::{CurveError, Result, Tolerance};
use serde::{Deserialize, Serialize};

/// An orthonormal planar coordinate frame.
///
/// The frame may be left-handed (`y_direction` clockwise from `x_direction`),
/// which is what mirroring a right-handed frame produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame2d {
    pub origin: Point2,
    pub x_direction: Vector2,
    pub y_direction: Vector2,
}

impl Frame2d {
    pub fn xy() -> Self {
        Self {
            origin: Point2::ZERO,
            x_direction: Vector2::X,
            y_direction: Vector2::Y,
        }
    }

    /// Right-handed frame with the given origin and x direction.
    pub fn new(origin: Point2, x_direction: Vector2) -> Result<Self> {
        let x_direction = x_direction
            .try_normalize()
            .ok_or_else(|| CurveError::Geometry("frame x direction has zero length".into()))?;
        Ok(Self {
            origin,
            x_direction,
            y_direction: x_direction.perp(),
        })
    }

    pub fn from_x_axis(axis: &Axis2d) -> Self {
        Self {
            origin: axis.origin,
            x_direction: axis.direction,
            y_direction: axis.direction.perp(),
        }
    }

    /// Frame from explicit directions, which must be unit length and perpendicular.
    pub fn with_directions(origin: Point2, x_direction: Vector2, y_direction: Vector2) -> Result<Self> {
        let tol = Tolerance::default();
        let orthonormal = tol.is_unit(x_direction.length())
            && tol.is_unit(y_direction.length())
            && tol.is_negligible(x_direction.dot(y_direction));
        if !orthonormal {
            return Err(CurveError::Geometry(
                "frame directions must be orthonormal".into(),
            ));
        }
        Ok(Self {
            origin,
            x_direction,
            y_direction,
        })
    }

    pub fn is_right_handed(&self) -> bool {
        self.x_direction.perp_dot(self.y_direction) > 0.0
    }

    /// Same frame with the y direction flipped (handedness reversed).
    pub fn reversed_y(&self) -> Self {
        Self {
            y_direction: -self.y_direction,
            ..*self
        }
    }

    pub fn point_to_global(&self, local: Point2) -> Point2 {
        self.origin + self.vector_to_global(local)
    }

    pub fn point_to_local(&self, global: Point2) -> Point2 {
        self.vector_to_local(global - self.origin)
    }

    pub fn vector_to_global(&self, local: Vector2) -> Vector2 {
        local.x * self.x_direction + local.y * self.y_direction
    }

    pub fn vector_to_local(&self, global: Vector2) -> Vector2 {
        Vector2::new(global.dot(self.x_direction), global.dot(self.y_direction))
    }
}

impl Default for Frame2d {
    fn default() -> Self {
        Self::xy()
    }
}
