//! Closed scalar intervals with conservative arithmetic.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A closed interval `[min, max]` of real numbers.
///
/// Every operation returns an interval that contains the result of applying
/// the operation to any values drawn from the operand intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const ZERO: Self = Self { min: 0.0, max: 0.0 };
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };
    pub const ENTIRE: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Builds an interval from two bounds given in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn singleton(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Smallest interval containing every value, or `None` for an empty iterator.
    pub fn hull_of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::singleton(first), |acc, v| acc.include(v)))
    }

    pub fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    pub fn hull(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(self) -> f64 {
        0.5 * (self.min + self.max)
    }

    pub fn contains(self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn contains_zero(self) -> bool {
        self.contains(0.0)
    }

    /// Value at fraction `f` of the way from `min` to `max`; exact at `f = 0` and `f = 1`.
    pub fn lerp(self, f: f64) -> f64 {
        (1.0 - f) * self.min + f * self.max
    }

    pub fn bisect(self) -> (Self, Self) {
        let mid = self.midpoint();
        (
            Self {
                min: self.min,
                max: mid,
            },
            Self {
                min: mid,
                max: self.max,
            },
        )
    }

    /// Grows both bounds outward by `margin`.
    pub fn widen(self, margin: f64) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Grows both bounds by `relative` times the larger bound magnitude, to absorb
    /// rounding differences between a bound and a direct evaluation.
    pub fn widen_relative(self, relative: f64) -> Self {
        self.widen(relative * self.magnitude())
    }

    /// Largest absolute value in the interval.
    pub fn magnitude(self) -> f64 {
        self.min.abs().max(self.max.abs())
    }

    pub fn abs(self) -> Self {
        if self.min >= 0.0 {
            self
        } else if self.max <= 0.0 {
            -self
        } else {
            Self {
                min: 0.0,
                max: (-self.min).max(self.max),
            }
        }
    }

    /// Tight enclosure of `x²`; unlike `self * self` it never goes negative.
    pub fn squared(self) -> Self {
        let a = self.abs();
        Self {
            min: a.min * a.min,
            max: a.max * a.max,
        }
    }

    /// Square root of the non-negative part of the interval.
    pub fn sqrt(self) -> Self {
        Self {
            min: self.min.max(0.0).sqrt(),
            max: self.max.max(0.0).sqrt(),
        }
    }

    /// Quotient enclosure. A divisor that contains zero gives [`Interval::ENTIRE`].
    pub fn divided_by(self, divisor: Self) -> Self {
        if divisor.contains_zero() {
            return Self::ENTIRE;
        }
        self * Self::new(1.0 / divisor.min, 1.0 / divisor.max)
    }

    pub fn cos(self) -> Self {
        self.periodic(f64::cos, 0.0)
    }

    pub fn sin(self) -> Self {
        self.periodic(f64::sin, FRAC_PI_2)
    }

    /// Enclosure of a unit-amplitude 2π-periodic function whose maxima sit at
    /// `peak + 2kπ` and minima at `peak + (2k + 1)π`.
    fn periodic(self, f: fn(f64) -> f64, peak: f64) -> Self {
        if !(self.width() < TAU) {
            return Self::new(-1.0, 1.0);
        }
        let mut result = Self::new(f(self.min), f(self.max));
        let next_peak = ((self.min - peak) / TAU).ceil() * TAU + peak;
        if next_peak <= self.max {
            result.max = 1.0;
        }
        let trough = peak + PI;
        let next_trough = ((self.min - trough) / TAU).ceil() * TAU + trough;
        if next_trough <= self.max {
            result.min = -1.0;
        }
        result
    }
}

impl Add for Interval {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

impl Add<f64> for Interval {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        Self {
            min: self.min + rhs,
            max: self.max + rhs,
        }
    }
}

impl Sub for Interval {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            min: self.min - rhs.max,
            max: self.max - rhs.min,
        }
    }
}

impl Neg for Interval {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            min: -self.max,
            max: -self.min,
        }
    }
}

impl Mul for Interval {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let corners = [
            self.min * rhs.min,
            self.min * rhs.max,
            self.max * rhs.min,
            self.max * rhs.max,
        ];
        Self {
            min: corners.iter().copied().fold(f64::INFINITY, f64::min),
            max: corners.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl Mul<f64> for Interval {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.min * rhs, self.max * rhs)
    }
}

impl approx::AbsDiffEq for Interval {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.min - other.min).abs() <= epsilon && (self.max - other.max).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_new_orders_bounds() {
        let i = Interval::new(3.0, -1.0);
        assert_eq!(i.min, -1.0);
        assert_eq!(i.max, 3.0);
        assert_eq!(i.width(), 4.0);
        assert_eq!(i.midpoint(), 1.0);
    }

    #[test]
    fn test_mul_sign_combinations() {
        let a = Interval::new(-2.0, 3.0);
        let b = Interval::new(-5.0, 1.0);
        assert_eq!(a * b, Interval::new(-15.0, 10.0));
        assert_eq!(a * -2.0, Interval::new(-6.0, 4.0));
    }

    #[test]
    fn test_squared_straddling_zero() {
        let i = Interval::new(-3.0, 2.0);
        assert_eq!(i.squared(), Interval::new(0.0, 9.0));
        assert_eq!(Interval::new(2.0, 3.0).squared(), Interval::new(4.0, 9.0));
        assert_eq!(Interval::new(-3.0, -2.0).squared(), Interval::new(4.0, 9.0));
    }

    #[test]
    fn test_divided_by() {
        let q = Interval::new(2.0, 4.0).divided_by(Interval::new(1.0, 2.0));
        assert_eq!(q, Interval::new(1.0, 4.0));
        assert_eq!(
            Interval::UNIT.divided_by(Interval::new(-1.0, 1.0)),
            Interval::ENTIRE
        );
    }

    #[test]
    fn test_cos_contains_interior_extrema() {
        let c = Interval::new(-0.5, 0.5).cos();
        assert_eq!(c.max, 1.0);
        assert!((c.min - 0.5f64.cos()).abs() < 1e-15);

        let c = Interval::new(3.0, 3.5).cos();
        assert_eq!(c.min, -1.0);

        let c = Interval::new(0.0, 7.0).cos();
        assert_eq!(c, Interval::new(-1.0, 1.0));
    }

    #[test]
    fn test_sin_cos_enclose_samples() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let a: f64 = rng.gen_range(-10.0..10.0);
            let b = a + rng.gen_range(0.0..4.0);
            let i = Interval::new(a, b);
            let (sin, cos) = (i.sin().widen_relative(1e-12), i.cos().widen_relative(1e-12));
            for k in 0..=10 {
                let x = i.lerp(k as f64 / 10.0);
                assert!(sin.contains(x.sin()), "sin({x}) escaped {sin:?}");
                assert!(cos.contains(x.cos()), "cos({x}) escaped {cos:?}");
            }
        }
    }

    #[test]
    fn test_lerp_exact_at_ends() {
        let i = Interval::new(0.1, 0.7);
        assert_eq!(i.lerp(0.0), 0.1);
        assert_eq!(i.lerp(1.0), 0.7);
    }

    #[test]
    fn test_serde_round_trip() {
        let i = Interval::new(-1.5, 2.25);
        let json = serde_json::to_string(&i).unwrap();
        assert_eq!(json, r#"{"min":-1.5,"max":2.25}"#);
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, i);
    }
}
