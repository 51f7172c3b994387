//! Decomposition of B-splines into Bezier segments by knot insertion.
//!
//! Every non-empty knot span becomes one segment. Its Bezier control points
//! are the blossom of the span's `degree + 1` control points evaluated at
//! `a…a b…b` (the span ends), which is what Boehm insertion produces once both
//! span ends reach multiplicity `degree`. The input sequences are only read.

use curvekit_core::Result;
use curvekit_math::{Homogeneous2, Interval, Point2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bspline::BSpline;
use crate::bezier::{lerp, ControlPoint};
use crate::curve::{
    CubicSpline, Curve, ParametricCurve, QuadraticSpline, RationalCubicSpline,
    RationalQuadraticSpline, RationalSpline, Spline,
};

/// One polynomial or rational piece of a decomposed B-spline.
///
/// The curve is parameterized over `[0, 1]`; `knot_interval` is the range of
/// the original knot parameter it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub curve: Curve,
    pub knot_interval: Interval,
}

impl Segment {
    pub fn width(&self) -> f64 {
        self.knot_interval.width()
    }

    pub fn point_on(&self, t: f64) -> Point2 {
        self.curve.point_on(t)
    }

    /// Knot parameter corresponding to the local parameter `t`.
    pub fn knot_parameter(&self, t: f64) -> f64 {
        self.knot_interval.lerp(t)
    }

    /// First derivative with respect to the original knot parameter.
    pub fn derivative_in_knot_space(&self, t: f64) -> Vector2 {
        self.curve.first_derivative(t) / self.width()
    }
}

/// Blossom (polar form) of the span's control points at `args`, by de Boor
/// blending with a different argument at each level.
///
/// `local_knots` holds the `2·degree` knots around the span and `points` the
/// `degree + 1` control points it depends on.
fn blossom<T: ControlPoint>(
    degree: usize,
    local_knots: &[f64],
    points: &[T],
    args: impl Iterator<Item = f64>,
) -> T {
    let mut work = points.to_vec();
    for (r, u) in (1..=degree).zip(args) {
        for j in (r..=degree).rev() {
            let lo = local_knots[j - 1];
            let hi = local_knots[j + degree - r];
            work[j] = lerp(work[j - 1], work[j], (u - lo) / (hi - lo));
        }
    }
    work[degree]
}

/// Bezier control points of span `span` for any degree.
fn inserted_piece<T: ControlPoint>(degree: usize, knots: &[f64], points: &[T], span: usize) -> Vec<T> {
    let (a, b) = (knots[span], knots[span + 1]);
    let local_knots = &knots[span + 1 - degree..=span + degree];
    let window = &points[span - degree..=span];
    (0..=degree)
        .map(|m| {
            let args = (0..degree).map(|j| if j < degree - m { a } else { b });
            blossom(degree, local_knots, window, args)
        })
        .collect()
}

/// Closed-form Bezier control points of quadratic span `i`.
fn quadratic_piece<T: ControlPoint>(k: &[f64], p: &[T], i: usize) -> Vec<T> {
    let (a, b) = (k[i], k[i + 1]);
    vec![
        lerp(p[i - 2], p[i - 1], (a - k[i - 1]) / (b - k[i - 1])),
        p[i - 1],
        lerp(p[i - 1], p[i], (b - a) / (k[i + 2] - a)),
    ]
}

/// Closed-form Bezier control points of cubic span `i`.
fn cubic_piece<T: ControlPoint>(k: &[f64], p: &[T], i: usize) -> Vec<T> {
    let (a, b) = (k[i], k[i + 1]);
    let inner = k[i + 2] - k[i - 1];
    let near_a = lerp(p[i - 2], p[i - 1], (a - k[i - 1]) / inner);
    let near_b = lerp(p[i - 2], p[i - 1], (b - k[i - 1]) / inner);
    let left = lerp(p[i - 3], p[i - 2], (a - k[i - 2]) / (b - k[i - 2]));
    let right = lerp(p[i - 1], p[i], (b - a) / (k[i + 3] - a));
    vec![
        lerp(left, near_a, (a - k[i - 1]) / (b - k[i - 1])),
        near_a,
        near_b,
        lerp(near_b, right, (b - a) / (k[i + 2] - a)),
    ]
}

/// Fold the non-empty spans into Bezier pieces. Each piece starts at the exact
/// point the previous one ended on.
fn bezier_pieces<T: ControlPoint>(
    degree: usize,
    knots: &[f64],
    count: usize,
    piece: impl Fn(usize) -> Vec<T>,
) -> Vec<(Interval, Vec<T>)> {
    (degree..count)
        .filter(|&span| knots[span] < knots[span + 1])
        .fold(Vec::new(), |mut pieces: Vec<(Interval, Vec<T>)>, span| {
            let mut points = piece(span);
            if let Some(end) = pieces.last().and_then(|(_, previous)| previous.last()) {
                points[0] = *end;
            }
            pieces.push((Interval::new(knots[span], knots[span + 1]), points));
            pieces
        })
}

fn polynomial_segment(knot_interval: Interval, points: Vec<Point2>) -> Result<Segment> {
    let curve = match points.as_slice() {
        &[a, b, c] => QuadraticSpline::new([a, b, c]).into(),
        &[a, b, c, d] => CubicSpline::new([a, b, c, d]).into(),
        _ => Spline::new(points.clone())?.into(),
    };
    Ok(Segment {
        curve,
        knot_interval,
    })
}

fn rational_segment(knot_interval: Interval, homogeneous: Vec<Homogeneous2>) -> Result<Segment> {
    let project = |h: Homogeneous2| h.truncate() / h.z;
    let curve = match homogeneous.as_slice() {
        &[a, b, c] => {
            RationalQuadraticSpline::new([project(a), project(b), project(c)], [a.z, b.z, c.z])?
                .into()
        }
        &[a, b, c, d] => RationalCubicSpline::new(
            [project(a), project(b), project(c), project(d)],
            [a.z, b.z, c.z, d.z],
        )?
        .into(),
        _ => RationalSpline::from_homogeneous(&homogeneous)?.into(),
    };
    Ok(Segment {
        curve,
        knot_interval,
    })
}

fn segments_with(
    spline: &BSpline,
    polynomial: impl Fn(usize, &[Point2]) -> Vec<Point2>,
    rational: impl Fn(usize, &[Homogeneous2]) -> Vec<Homogeneous2>,
) -> Result<Vec<Segment>> {
    let degree = spline.degree();
    let knots = spline.knots();
    let count = spline.control_points().len();

    let segments = if spline.is_rational() {
        let arena = spline.homogeneous_points();
        bezier_pieces(degree, knots, count, |span| rational(span, &arena))
            .into_iter()
            .map(|(interval, points)| rational_segment(interval, points))
            .collect::<Result<Vec<_>>>()?
    } else {
        let arena = spline.control_points();
        bezier_pieces(degree, knots, count, |span| polynomial(span, arena))
            .into_iter()
            .map(|(interval, points)| polynomial_segment(interval, points))
            .collect::<Result<Vec<_>>>()?
    };

    debug!(
        degree,
        segments = segments.len(),
        rational = spline.is_rational(),
        "decomposed B-spline"
    );
    Ok(segments)
}

/// Split a B-spline of any degree into one Bezier segment per non-empty knot span.
///
/// Quadratic and cubic pieces come out as [`Curve::Quadratic`] and
/// [`Curve::Cubic`] (or their rational forms when the spline is weighted);
/// other degrees as [`Curve::Spline`] / [`Curve::RationalSpline`].
pub fn decompose(spline: &BSpline) -> Result<Vec<Segment>> {
    let degree = spline.degree();
    let knots = spline.knots();
    segments_with(
        spline,
        |span, points| inserted_piece(degree, knots, points, span),
        |span, points| inserted_piece(degree, knots, points, span),
    )
}

/// Decompose a quadratic B-spline using closed-form insertion.
///
/// Accepts the same knot vector forms as [`BSpline::new`].
pub fn quadratic_segments(
    knots: &[f64],
    control_points: &[Point2],
    weights: Option<&[f64]>,
) -> Result<Vec<Segment>> {
    let spline = BSpline::with_weights(2, knots, control_points, weights)?;
    let full = spline.knots();
    segments_with(
        &spline,
        |span, points| quadratic_piece(full, points, span),
        |span, points| quadratic_piece(full, points, span),
    )
}

/// Decompose a cubic B-spline using closed-form insertion.
///
/// Accepts the same knot vector forms as [`BSpline::new`].
pub fn cubic_segments(
    knots: &[f64],
    control_points: &[Point2],
    weights: Option<&[f64]>,
) -> Result<Vec<Segment>> {
    let spline = BSpline::with_weights(3, knots, control_points, weights)?;
    let full = spline.knots();
    segments_with(
        &spline,
        |span, points| cubic_piece(full, points, span),
        |span, points| cubic_piece(full, points, span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvekit_math::dvec2;

    fn zigzag(n: usize) -> Vec<Point2> {
        (0..n)
            .map(|i| dvec2(i as f64, if i % 2 == 0 { 0.0 } else { 1.5 }))
            .collect()
    }

    fn assert_segments_close(a: &[Segment], b: &[Segment]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.knot_interval, y.knot_interval);
            for i in 0..=8 {
                let t = i as f64 / 8.0;
                assert!(
                    (x.point_on(t) - y.point_on(t)).length() < 1e-12,
                    "segments differ at t={}",
                    t
                );
            }
        }
    }

    #[test]
    fn test_blossom_reproduces_evaluation() {
        let knots = vec![0.0, 0.0, 0.0, 0.3, 0.6, 1.0, 1.0, 1.0];
        let spline = BSpline::new(2, knots, zigzag(5)).unwrap();
        let segments = decompose(&spline).unwrap();
        assert_eq!(segments.len(), 3);
        for segment in &segments {
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                let u = segment.knot_parameter(t);
                assert!((segment.point_on(t) - spline.point_at(u)).length() < 1e-12);
                let tangent = segment.derivative_in_knot_space(t);
                assert!((tangent - spline.tangent_at(u)).length() < 1e-9);
            }
        }
    }

    #[test]
    fn test_quadratic_closed_form_matches_generic() {
        let knots = [0.0, 0.0, 0.0, 0.25, 0.5, 0.5, 1.0, 1.0, 1.0];
        let points = zigzag(6);
        let generic = decompose(&BSpline::new(2, knots.to_vec(), points.clone()).unwrap()).unwrap();
        let closed = quadratic_segments(&knots, &points, None).unwrap();
        assert_segments_close(&generic, &closed);
    }

    #[test]
    fn test_cubic_closed_form_matches_generic() {
        let knots = [0.0, 0.0, 0.0, 0.0, 0.2, 0.5, 0.5, 0.8, 1.0, 1.0, 1.0, 1.0];
        let points = zigzag(8);
        let weights = [1.0, 2.0, 0.5, 1.0, 1.5, 1.0, 3.0, 1.0];
        let generic =
            decompose(&BSpline::rational(3, knots.to_vec(), points.clone(), weights.to_vec()).unwrap())
                .unwrap();
        let closed = cubic_segments(&knots, &points, Some(&weights)).unwrap();
        assert_segments_close(&generic, &closed);
        assert!(matches!(closed[0].curve, Curve::RationalCubic(_)));
    }

    #[test]
    fn test_higher_degree_emits_generic_spline() {
        let knots = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0];
        let spline = BSpline::new(4, knots, zigzag(6)).unwrap();
        let segments = spline.segments().unwrap();
        assert_eq!(segments.len(), 2);
        assert!(matches!(segments[0].curve, Curve::Spline(_)));
        assert_eq!(segments[0].curve.end_point(), segments[1].curve.start_point());
    }

    #[test]
    fn test_wrong_count_is_rejected() {
        let err = quadratic_segments(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0], &zigzag(4), None).unwrap_err();
        assert!(matches!(err, curvekit_core::CurveError::InvalidKnotVector(_)));
    }
}
