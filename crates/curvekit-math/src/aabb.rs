use crate::{Interval, Point2, Vector2, VectorBox2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of planar points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn from_intervals(x: Interval, y: Interval) -> Self {
        Self {
            min: Point2::new(x.min, y.min),
            max: Point2::new(x.max, y.max),
        }
    }

    /// A box centred on `center` whose extents from the centre are given by `offsets`.
    pub fn around(center: Point2, offsets: &VectorBox2) -> Self {
        Self::from_intervals(offsets.x() + center.x, offsets.y() + center.y)
    }

    pub fn x_interval(&self) -> Interval {
        Interval::new(self.min.x, self.max.x)
    }

    pub fn y_interval(&self) -> Interval {
        Interval::new(self.min.y, self.max.y)
    }

    pub fn center(&self) -> Point2 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vector2 {
        self.max - self.min
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expand(&self, amount: f64) -> Self {
        let offset = Vector2::splat(amount);
        Self {
            min: self.min - offset,
            max: self.max + offset,
        }
    }
}
