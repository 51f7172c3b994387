//! Axis-aligned bounds over families of vectors.
//!
//! A [`VectorBox`] holds one [`Interval`] per axis and bounds every vector a
//! family can produce (for example the derivative of a curve over a parameter
//! sub-range). All arithmetic is conservative: the result of an operation
//! bounds the operation applied to every combination of vectors drawn from
//! the operand boxes.

use std::array;

use crate::Interval;

/// Per-axis interval bounds on an `N`-dimensional vector family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorBox<const N: usize> {
    components: [Interval; N],
}

/// Bounds on planar vectors.
pub type VectorBox2 = VectorBox<2>;
/// Bounds on homogeneous planar vectors `(w·x, w·y, w)`.
pub type VectorBox3 = VectorBox<3>;
pub type VectorBox4 = VectorBox<4>;

impl<const N: usize> VectorBox<N> {
    pub fn new(components: [Interval; N]) -> Self {
        Self { components }
    }

    /// The degenerate box containing a single vector.
    pub fn constant(vector: impl Into<[f64; N]>) -> Self {
        Self {
            components: vector.into().map(Interval::singleton),
        }
    }

    /// Smallest box containing every vector, or `None` for an empty iterator.
    pub fn from_vectors<V: Into<[f64; N]>>(vectors: impl IntoIterator<Item = V>) -> Option<Self> {
        let mut iter = vectors.into_iter();
        let first = Self::constant(iter.next()?);
        Some(iter.fold(first, |acc, v| acc.hull(&Self::constant(v))))
    }

    pub fn components(&self) -> &[Interval; N] {
        &self.components
    }

    pub fn component(&self, axis: usize) -> Interval {
        self.components[axis]
    }

    pub fn lower(&self) -> [f64; N] {
        self.components.map(|c| c.min)
    }

    pub fn upper(&self) -> [f64; N] {
        self.components.map(|c| c.max)
    }

    pub fn hull(&self, other: &Self) -> Self {
        self.zip(other, Interval::hull)
    }

    pub fn contains(&self, vector: impl Into<[f64; N]>) -> bool {
        let v = vector.into();
        self.components
            .iter()
            .zip(v)
            .all(|(c, value)| c.contains(value))
    }

    pub fn half(&self) -> Self {
        self.multiply_by(0.5)
    }

    pub fn twice(&self) -> Self {
        self.multiply_by(2.0)
    }

    pub fn multiply_by(&self, scale: f64) -> Self {
        self.map(|c| c * scale)
    }

    /// Scales by any value in `scale`, keeping the sign combinations straight.
    pub fn times(&self, scale: Interval) -> Self {
        self.map(|c| c * scale)
    }

    pub fn divided_by(&self, divisor: Interval) -> Self {
        self.map(|c| c.divided_by(divisor))
    }

    pub fn plus(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a + b)
    }

    pub fn minus(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a - b)
    }

    pub fn plus_vector(&self, vector: impl Into<[f64; N]>) -> Self {
        self.plus(&Self::constant(vector))
    }

    pub fn minus_vector(&self, vector: impl Into<[f64; N]>) -> Self {
        self.minus(&Self::constant(vector))
    }

    /// Axis-wise interval product.
    pub fn product(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a * b)
    }

    pub fn dot(&self, other: &Self) -> Interval {
        self.product(other)
            .components
            .into_iter()
            .fold(Interval::ZERO, |acc, c| acc + c)
    }

    /// Bounds on the squared Euclidean norm.
    ///
    /// Axes of a box vary independently, so summing the tight per-axis squares
    /// is exact: the minimum and maximum are attained at corners (or on the
    /// axis-zero crossings) of the box.
    pub fn squared_length(&self) -> Interval {
        self.components
            .iter()
            .fold(Interval::ZERO, |acc, c| acc + c.squared())
    }

    /// Bounds on the Euclidean norm of every vector in the box.
    pub fn length(&self) -> Interval {
        self.squared_length().sqrt()
    }

    pub fn widen(&self, margin: f64) -> Self {
        self.map(|c| c.widen(margin))
    }

    /// Largest absolute coordinate any vector in the box can have.
    pub fn magnitude(&self) -> f64 {
        self.components
            .iter()
            .fold(0.0, |acc: f64, c| acc.max(c.magnitude()))
    }

    pub fn widen_relative(&self, relative: f64) -> Self {
        self.map(|c| c.widen_relative(relative))
    }

    fn map(&self, f: impl Fn(Interval) -> Interval) -> Self {
        Self {
            components: self.components.map(f),
        }
    }

    fn zip(&self, other: &Self, f: impl Fn(Interval, Interval) -> Interval) -> Self {
        Self {
            components: array::from_fn(|i| f(self.components[i], other.components[i])),
        }
    }
}

impl VectorBox<2> {
    pub fn x(&self) -> Interval {
        self.components[0]
    }

    pub fn y(&self) -> Interval {
        self.components[1]
    }

    /// Planar cross product `a.x * b.y - a.y * b.x`.
    pub fn cross(&self, other: &Self) -> Interval {
        self.x() * other.y() - self.y() * other.x()
    }
}
