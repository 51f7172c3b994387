use crate::{Axis2d, Frame2d, Point2, Vector2};
use glam::{DAffine2, DMat2};
use serde::{Deserialize, Serialize};

/// Planar similarity transform (rotation, reflection, uniform scale, translation).
///
/// Only similarities can be built, so circular arcs stay circular under every
/// transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2 {
    affine: DAffine2,
}

impl Transform2 {
    pub fn identity() -> Self {
        Self {
            affine: DAffine2::IDENTITY,
        }
    }

    pub fn translation(displacement: Vector2) -> Self {
        Self {
            affine: DAffine2::from_translation(displacement),
        }
    }

    /// Counterclockwise rotation by `angle` radians about `center`.
    pub fn rotation_around(center: Point2, angle: f64) -> Self {
        Self::about(center, DMat2::from_angle(angle))
    }

    pub fn scaling_about(center: Point2, factor: f64) -> Self {
        Self::about(center, DMat2::from_diagonal(Vector2::splat(factor)))
    }

    pub fn mirror_across(axis: &Axis2d) -> Self {
        let d = axis.direction;
        let reflection = DMat2::from_cols(
            Vector2::new(2.0 * d.x * d.x - 1.0, 2.0 * d.x * d.y),
            Vector2::new(2.0 * d.x * d.y, 2.0 * d.y * d.y - 1.0),
        );
        Self::about(axis.origin, reflection)
    }

    /// Maps coordinates expressed in `frame` to global coordinates.
    pub fn placement(frame: &Frame2d) -> Self {
        Self {
            affine: DAffine2::from_cols(frame.x_direction, frame.y_direction, frame.origin),
        }
    }

    /// Maps global coordinates to coordinates expressed in `frame`.
    pub fn relative_to(frame: &Frame2d) -> Self {
        let (x, y) = (frame.x_direction, frame.y_direction);
        let linear = DMat2::from_cols(Vector2::new(x.x, y.x), Vector2::new(x.y, y.y));
        Self {
            affine: DAffine2::from_mat2_translation(
                linear,
                -Vector2::new(frame.origin.dot(x), frame.origin.dot(y)),
            ),
        }
    }

    fn about(center: Point2, linear: DMat2) -> Self {
        let affine = DAffine2::from_translation(center)
            * DAffine2::from_mat2(linear)
            * DAffine2::from_translation(-center);
        Self { affine }
    }

    pub fn affine(&self) -> DAffine2 {
        self.affine
    }

    pub fn transform_point(&self, p: Point2) -> Point2 {
        self.affine.transform_point2(p)
    }

    pub fn transform_vector(&self, v: Vector2) -> Vector2 {
        self.affine.transform_vector2(v)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Transform2) -> Transform2 {
        Self {
            affine: other.affine * self.affine,
        }
    }

    pub fn inverse(&self) -> Option<Transform2> {
        // Check if inverse is valid (determinant != 0)
        if self.affine.matrix2.determinant().abs() < 1e-15 {
            None
        } else {
            Some(Self {
                affine: self.affine.inverse(),
            })
        }
    }

    /// Uniform length scale applied by the transform.
    pub fn scale_factor(&self) -> f64 {
        self.affine.matrix2.determinant().abs().sqrt()
    }

    /// Whether the transform flips orientation (contains a reflection).
    pub fn is_orientation_reversing(&self) -> bool {
        self.affine.matrix2.determinant() < 0.0
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::identity()
    }
}
