//! B-spline and NURBS curve evaluation.
//!
//! The polynomial routines are generic over the control point type so the
//! rational routines can reuse them on homogeneous points.

use curvekit_math::{Homogeneous2, Point2, Vector2};

use super::knot::{basis_functions, find_span};
use crate::bezier::ControlPoint;

/// Evaluate a B-spline curve at `u` as a combination of its nonzero basis functions.
pub fn curve_point<T: ControlPoint>(degree: usize, knots: &[f64], control_points: &[T], u: f64) -> T {
    let last = control_points.len() - 1;
    let span = find_span(degree, knots, last, u);
    let basis = basis_functions(degree, knots, span, u);
    let first = span - degree;
    basis
        .iter()
        .enumerate()
        .skip(1)
        .fold(control_points[first] * basis[0], |acc, (i, &b)| {
            acc + control_points[first + i] * b
        })
}

/// Control points of the derivative curve, which has degree `degree - 1` over
/// the knot vector with its first and last knots removed.
fn derivative_points<T: ControlPoint>(degree: usize, knots: &[f64], control_points: &[T]) -> Vec<T> {
    control_points
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let span = knots[i + degree + 1] - knots[i + 1];
            let scale = if span > 0.0 { degree as f64 / span } else { 0.0 };
            (pair[1] - pair[0]) * scale
        })
        .collect()
}

/// First derivative of a B-spline curve at `u`.
pub fn curve_derivative<T: ControlPoint>(
    degree: usize,
    knots: &[f64],
    control_points: &[T],
    u: f64,
) -> T {
    if degree == 0 || control_points.len() < 2 {
        return control_points[0] - control_points[0];
    }
    let hodograph = derivative_points(degree, knots, control_points);
    curve_point(degree - 1, &knots[1..knots.len() - 1], &hodograph, u)
}

/// Planar tangent (first derivative) of a B-spline curve at `u`.
pub fn curve_tangent(degree: usize, knots: &[f64], control_points: &[Point2], u: f64) -> Vector2 {
    curve_derivative(degree, knots, control_points, u)
}

/// Evaluate a rational B-spline (NURBS) curve at `u` from homogeneous
/// control points `(w·x, w·y, w)`.
pub fn nurbs_curve_point(degree: usize, knots: &[f64], homogeneous: &[Homogeneous2], u: f64) -> Point2 {
    let h = curve_point(degree, knots, homogeneous, u);
    h.truncate() / h.z
}

/// Tangent of a NURBS curve at `u`: `(H' - w'·C) / w` for the homogeneous curve `H`.
pub fn nurbs_curve_tangent(
    degree: usize,
    knots: &[f64],
    homogeneous: &[Homogeneous2],
    u: f64,
) -> Vector2 {
    let h = curve_point(degree, knots, homogeneous, u);
    let dh = curve_derivative(degree, knots, homogeneous, u);
    let c = h.truncate() / h.z;
    (dh.truncate() - dh.z * c) / h.z
}
