//! Bernstein-form helpers shared by the spline variants.
//!
//! Everything works on slices of control points of any type that supports
//! affine combination, so the same code serves planar points (`DVec2`) and
//! homogeneous weighted points (`DVec3`).

use std::ops::{Add, Mul, Sub};

use curvekit_math::VectorBox;

/// Relative slack added to control-polygon bounds so that a bound computed by
/// subdivision still contains a direct evaluation despite rounding.
pub(crate) const ROUNDING_SLACK: f64 = 64.0 * f64::EPSILON;

pub trait ControlPoint: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self> {}

impl<T> ControlPoint for T where T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T> {}

/// Affine blend that returns `a` exactly at `t = 0` and `b` exactly at `t = 1`.
pub fn lerp<T: ControlPoint>(a: T, b: T, t: f64) -> T {
    a * (1.0 - t) + b * t
}

/// De Casteljau evaluation.
pub fn point<T: ControlPoint>(points: &[T], t: f64) -> T {
    let mut work = points.to_vec();
    for level in 1..work.len() {
        for i in 0..work.len() - level {
            work[i] = lerp(work[i], work[i + 1], t);
        }
    }
    work[0]
}

/// Control points of the derivative curve (the hodograph).
pub fn derivative<T: ControlPoint>(points: &[T]) -> Vec<T> {
    let degree = points.len() - 1;
    if degree == 0 {
        return vec![points[0] - points[0]];
    }
    points
        .windows(2)
        .map(|w| (w[1] - w[0]) * degree as f64)
        .collect()
}

/// Split at `t` into the control polygons of `[0, t]` and `[t, 1]`.
pub fn split<T: ControlPoint>(points: &[T], t: f64) -> (Vec<T>, Vec<T>) {
    let n = points.len();
    let mut work = points.to_vec();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    left.push(work[0]);
    right.push(work[n - 1]);
    for level in 1..n {
        for i in 0..n - level {
            work[i] = lerp(work[i], work[i + 1], t);
        }
        left.push(work[0]);
        right.push(work[n - 1 - level]);
    }
    right.reverse();
    (left, right)
}

/// Control polygon of the sub-curve over `[t0, t1]`, reparameterized to `[0, 1]`.
pub fn sub_segment<T: ControlPoint>(points: &[T], t0: f64, t1: f64) -> Vec<T> {
    if t1 <= 0.0 {
        return vec![point(points, 0.0); points.len()];
    }
    let head = if t1 >= 1.0 {
        points.to_vec()
    } else {
        split(points, t1).0
    };
    if t0 <= 0.0 {
        return head;
    }
    split(&head, t0 / t1).1
}

pub fn reversed<T: ControlPoint>(points: &[T]) -> Vec<T> {
    points.iter().rev().copied().collect()
}

/// Box around a control polygon (and therefore, by the convex hull property,
/// around the curve it defines), padded for rounding relative to `scale`.
pub fn hull<const N: usize, T>(points: &[T], scale: f64) -> VectorBox<N>
where
    T: ControlPoint + Into<[f64; N]>,
{
    let exact = VectorBox::from_vectors(points.iter().copied())
        .unwrap_or_else(|| VectorBox::constant([0.0; N]));
    exact.widen(ROUNDING_SLACK * scale)
}

/// Largest absolute coordinate among the control points.
pub fn magnitude<const N: usize, T>(points: &[T]) -> f64
where
    T: Copy + Into<[f64; N]>,
{
    points
        .iter()
        .flat_map(|&p| Into::<[f64; N]>::into(p))
        .fold(0.0, |acc: f64, c| acc.max(c.abs()))
}

/// Bounds on the derivative of the curve over `[t0, t1]`.
pub fn derivative_bounds<const N: usize, T>(points: &[T], t0: f64, t1: f64) -> VectorBox<N>
where
    T: ControlPoint + Into<[f64; N]>,
{
    let hodograph = derivative(points);
    let scale = magnitude::<N, T>(&hodograph);
    hull::<N, T>(&sub_segment(&hodograph, t0, t1), scale)
}
