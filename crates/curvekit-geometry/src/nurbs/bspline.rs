//! B-spline and NURBS curve definitions.

use curvekit_core::{CurveError, Result, Validate};
use curvekit_math::{Homogeneous2, Interval, Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::decompose::{decompose, Segment};
use super::{deboor, knot};

/// A (possibly rational) B-spline curve defined by degree, knot vector, and
/// control points.
///
/// The knot vector is always stored in full form, with
/// `control_points.len() + degree + 1` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BSplineDef")]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<Point2>,
    weights: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct BSplineDef {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<Point2>,
    #[serde(default)]
    weights: Option<Vec<f64>>,
}

impl TryFrom<BSplineDef> for BSpline {
    type Error = CurveError;

    fn try_from(def: BSplineDef) -> Result<Self> {
        Self::build(def.degree, def.knots, def.control_points, def.weights)
    }
}

impl BSpline {
    /// Build a polynomial B-spline.
    ///
    /// `knots` may be given in full form (`n + degree + 1` entries for `n`
    /// control points) or in compact form without the outermost end knots
    /// (`n + degree - 1` entries, e.g. `[0, 0, 1, 1]` for a quadratic Bezier).
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<Point2>) -> Result<Self> {
        Self::build(degree, knots, control_points, None)
    }

    /// Build a rational B-spline with one positive weight per control point.
    pub fn rational(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Point2>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        Self::build(degree, knots, control_points, Some(weights))
    }

    /// Build from optional weights, the form the decomposer entry points take.
    pub fn with_weights(
        degree: usize,
        knots: &[f64],
        control_points: &[Point2],
        weights: Option<&[f64]>,
    ) -> Result<Self> {
        Self::build(
            degree,
            knots.to_vec(),
            control_points.to_vec(),
            weights.map(<[f64]>::to_vec),
        )
    }

    fn build(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Point2>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = control_points.len();
        let knots = if degree >= 1 && n > 0 && knots.len() + 2 == n + degree + 1 {
            let (first, last) = match (knots.first(), knots.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => {
                    return Err(CurveError::InvalidKnotVector("knot vector is empty".into()))
                }
            };
            let mut full = Vec::with_capacity(knots.len() + 2);
            full.push(first);
            full.extend_from_slice(&knots);
            full.push(last);
            full
        } else {
            knots
        };
        Self {
            degree,
            knots,
            control_points,
            weights,
        }
        .validated()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    /// Control points as `(w·x, w·y, w)`, with weight 1 when the spline is polynomial.
    pub fn homogeneous_points(&self) -> Vec<Homogeneous2> {
        match &self.weights {
            Some(weights) => self
                .control_points
                .iter()
                .zip(weights)
                .map(|(&p, &w)| (p * w).extend(w))
                .collect(),
            None => self.control_points.iter().map(|p| p.extend(1.0)).collect(),
        }
    }

    /// Parameter range `[knots[degree], knots[n]]` over which the curve is defined.
    pub fn domain(&self) -> Interval {
        Interval::new(
            self.knots[self.degree],
            self.knots[self.control_points.len()],
        )
    }

    pub fn knot_multiplicity(&self, u: f64) -> usize {
        knot::multiplicity(&self.knots, u)
    }

    /// Evaluate the curve at `u`, clamped into the domain.
    pub fn point_at(&self, u: f64) -> Point2 {
        let u = self.clamp_to_domain(u);
        match self.weights {
            Some(_) => {
                deboor::nurbs_curve_point(self.degree, &self.knots, &self.homogeneous_points(), u)
            }
            None => deboor::curve_point(self.degree, &self.knots, &self.control_points, u),
        }
    }

    /// Derivative with respect to the knot parameter at `u`, clamped into the domain.
    pub fn tangent_at(&self, u: f64) -> Vector2 {
        let u = self.clamp_to_domain(u);
        match self.weights {
            Some(_) => {
                deboor::nurbs_curve_tangent(self.degree, &self.knots, &self.homogeneous_points(), u)
            }
            None => deboor::curve_tangent(self.degree, &self.knots, &self.control_points, u),
        }
    }

    /// Split into one Bezier segment per non-empty knot span.
    pub fn segments(&self) -> Result<Vec<Segment>> {
        decompose(self)
    }

    fn clamp_to_domain(&self, u: f64) -> f64 {
        let domain = self.domain();
        u.max(domain.min).min(domain.max)
    }
}

impl Validate for BSpline {
    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(CurveError::InvalidKnotVector(msg));
        let n = self.control_points.len();
        if self.degree == 0 {
            return invalid("degree must be at least 1".into());
        }
        if n < self.degree + 1 {
            return invalid(format!(
                "degree {} needs at least {} control points, got {}",
                self.degree,
                self.degree + 1,
                n
            ));
        }
        if self.knots.len() != n + self.degree + 1 {
            return invalid(format!(
                "expected {} knots for {} control points of degree {}, got {}",
                n + self.degree + 1,
                n,
                self.degree,
                self.knots.len()
            ));
        }
        if let Some(i) = self.knots.iter().position(|k| !k.is_finite()) {
            return invalid(format!("knot {} is not finite", i));
        }
        if let Some(i) = self.knots.windows(2).position(|w| w[1] < w[0]) {
            return invalid(format!("knots decrease at index {}", i + 1));
        }
        let (start, end) = (self.knots[self.degree], self.knots[n]);
        if start >= end {
            return invalid("parameter domain is empty".into());
        }
        // An interior knot repeated more than `degree` times breaks the curve apart.
        if let Some(&u) = self.knots[self.degree + 1..n].iter().find(|&&u| {
            u > start && u < end && knot::multiplicity(&self.knots, u) > self.degree
        }) {
            return invalid(format!(
                "interior knot {} has multiplicity {}, more than degree {}",
                u,
                knot::multiplicity(&self.knots, u),
                self.degree
            ));
        }
        if let Some(weights) = &self.weights {
            if weights.len() != n {
                return invalid(format!(
                    "{} weights given for {} control points",
                    weights.len(),
                    n
                ));
            }
            if let Some(i) = weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
                return invalid(format!("weight {} at index {} is not positive", weights[i], i));
            }
        }
        Ok(())
    }
}
