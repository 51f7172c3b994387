//! B-spline decomposition: segments reproduce the spline and join exactly.

use curvekit_core::CurveError;
use curvekit_geometry::nurbs::{cubic_segments, decompose, quadratic_segments};
use curvekit_geometry::{BSpline, Curve, ParametricCurve, Segment};
use curvekit_math::{dvec2, Point2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// ============================================================================
// Helpers
// ============================================================================

fn wave(n: usize) -> Vec<Point2> {
    (0..n)
        .map(|i| dvec2(i as f64 * 0.75, ((i * 7) % 5) as f64 - 2.0))
        .collect()
}

fn assert_reproduces(spline: &BSpline, segments: &[Segment]) {
    for segment in segments {
        for i in 0..=12 {
            let t = i as f64 / 12.0;
            let u = segment.knot_parameter(t);
            let expected = spline.point_at(u);
            assert!(
                (segment.point_on(t) - expected).length() < 1e-9,
                "segment over {:?} misses the spline at u={}",
                segment.knot_interval,
                u
            );
        }
    }
}

fn assert_joined(segments: &[Segment]) {
    for pair in segments.windows(2) {
        assert_eq!(pair[0].curve.end_point(), pair[1].curve.start_point());
        assert_eq!(pair[0].knot_interval.max, pair[1].knot_interval.min);
    }
}

// ============================================================================
// Single segments
// ============================================================================

#[test]
fn test_quadratic_bezier_is_returned_unchanged() {
    let points = [dvec2(0.1, 0.3), dvec2(1.7, 2.9), dvec2(3.3, -0.7)];
    let segments = quadratic_segments(&[0.0, 0.0, 1.0, 1.0], &points, None).unwrap();
    assert_eq!(segments.len(), 1);
    match &segments[0].curve {
        Curve::Quadratic(q) => assert_eq!(q.control_points(), &points),
        other => panic!("expected a quadratic segment, got {}", other.kind()),
    }
    assert_eq!(segments[0].knot_interval.min, 0.0);
    assert_eq!(segments[0].knot_interval.max, 1.0);
}

#[test]
fn test_cubic_bezier_is_returned_unchanged() {
    let points = [
        dvec2(0.1, 0.3),
        dvec2(1.7, 2.9),
        dvec2(3.3, -0.7),
        dvec2(4.1, 0.2),
    ];
    let compact = cubic_segments(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0], &points, None).unwrap();
    let full = cubic_segments(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0], &points, None).unwrap();
    assert_eq!(compact, full);
    match &compact[0].curve {
        Curve::Cubic(c) => assert_eq!(c.control_points(), &points),
        other => panic!("expected a cubic segment, got {}", other.kind()),
    }
}

#[test]
fn test_rational_bezier_keeps_weights() {
    let points = [
        dvec2(0.0, 0.0),
        dvec2(1.0, 2.0),
        dvec2(2.0, -1.0),
        dvec2(3.0, 0.0),
    ];
    let weights = [1.0, 0.5, 2.0, 1.0];
    let segments = cubic_segments(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0], &points, Some(&weights)).unwrap();
    match &segments[0].curve {
        Curve::RationalCubic(c) => {
            assert_eq!(c.control_points(), &points);
            assert_eq!(c.weights(), &weights);
        }
        other => panic!("expected a rational cubic segment, got {}", other.kind()),
    }
}

#[test]
fn test_general_path_returns_single_beziers_unchanged() {
    let quadratic = vec![dvec2(0.1, 0.3), dvec2(1.7, 2.9), dvec2(3.3, -0.7)];
    let spline = BSpline::new(2, vec![0.0, 0.0, 1.0, 1.0], quadratic.clone()).unwrap();
    let general = decompose(&spline).unwrap();
    match &general[..] {
        [Segment {
            curve: Curve::Quadratic(q),
            ..
        }] => assert_eq!(q.control_points().as_slice(), quadratic.as_slice()),
        other => panic!("expected one quadratic segment, got {:?}", other),
    }
    assert_eq!(general, quadratic_segments(&[0.0, 0.0, 1.0, 1.0], &quadratic, None).unwrap());

    let cubic = vec![
        dvec2(0.1, 0.3),
        dvec2(1.7, 2.9),
        dvec2(3.3, -0.7),
        dvec2(4.1, 0.2),
    ];
    let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let spline = BSpline::new(3, knots.clone(), cubic.clone()).unwrap();
    let general = decompose(&spline).unwrap();
    match &general[..] {
        [Segment {
            curve: Curve::Cubic(c),
            ..
        }] => assert_eq!(c.control_points().as_slice(), cubic.as_slice()),
        other => panic!("expected one cubic segment, got {:?}", other),
    }
    assert_eq!(general, cubic_segments(&knots, &cubic, None).unwrap());
}

// ============================================================================
// Multi-segment splines
// ============================================================================

#[test]
fn test_one_segment_per_nonempty_span() {
    let knots = vec![0.0, 0.0, 0.0, 0.0, 0.2, 0.2, 0.6, 0.9, 1.0, 1.0, 1.0, 1.0];
    let spline = BSpline::new(3, knots, wave(8)).unwrap();
    let segments = decompose(&spline).unwrap();
    assert_eq!(segments.len(), 4);
    assert_reproduces(&spline, &segments);
    assert_joined(&segments);
    assert_eq!(segments[0].curve.start_point(), spline.control_points()[0]);
    assert_eq!(segments[3].curve.end_point(), spline.control_points()[7]);
}

#[test]
fn test_interior_multiplicity_below_degree_keeps_tangent_continuity() {
    // Knot 0.5 has multiplicity 2 in a cubic: C1 across it.
    let knots = vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0, 1.0];
    let spline = BSpline::new(3, knots, wave(6)).unwrap();
    let segments = decompose(&spline).unwrap();
    assert_eq!(segments.len(), 2);
    assert_joined(&segments);
    let left = segments[0].derivative_in_knot_space(1.0);
    let right = segments[1].derivative_in_knot_space(0.0);
    assert!((left - right).length() < 1e-9, "{:?} vs {:?}", left, right);
}

#[test]
fn test_full_multiplicity_interpolates_control_point() {
    // Knot 0.5 has multiplicity 3 in a cubic: the curve passes through P3.
    let knots = vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0, 1.0];
    let points = wave(7);
    let spline = BSpline::new(3, knots, points.clone()).unwrap();
    let segments = decompose(&spline).unwrap();
    assert_eq!(segments.len(), 2);
    assert_joined(&segments);
    assert!((segments[0].curve.end_point() - points[3]).length() < 1e-12);
    assert_reproduces(&spline, &segments);
}

#[test]
fn test_rational_circle_decomposes_into_quarters() {
    let w = 0.5f64.sqrt();
    let points = vec![
        dvec2(1.0, 0.0),
        dvec2(1.0, 1.0),
        dvec2(0.0, 1.0),
        dvec2(-1.0, 1.0),
        dvec2(-1.0, 0.0),
        dvec2(-1.0, -1.0),
        dvec2(0.0, -1.0),
        dvec2(1.0, -1.0),
        dvec2(1.0, 0.0),
    ];
    let weights = vec![1.0, w, 1.0, w, 1.0, w, 1.0, w, 1.0];
    let knots = vec![0.0, 0.0, 0.0, 0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0, 1.0];
    let spline = BSpline::rational(2, knots, points, weights).unwrap();
    let segments = spline.segments().unwrap();
    assert_eq!(segments.len(), 4);
    assert_joined(&segments);
    for segment in &segments {
        assert!(matches!(segment.curve, Curve::RationalQuadratic(_)));
        for i in 0..=10 {
            let p = segment.point_on(i as f64 / 10.0);
            assert!((p.length() - 1.0).abs() < 1e-12);
        }
    }
    assert_reproduces(&spline, &segments);
}

#[test]
fn test_closed_forms_agree_with_general_insertion() {
    let quadratic_knots = [0.0, 0.0, 0.1, 0.4, 0.4, 0.7, 1.0, 1.0];
    let points = wave(7);
    let general = decompose(&BSpline::new(2, quadratic_knots.to_vec(), points.clone()).unwrap())
        .unwrap();
    let closed = quadratic_segments(&quadratic_knots, &points, None).unwrap();
    assert_eq!(general.len(), closed.len());
    for (a, b) in general.iter().zip(&closed) {
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!((a.point_on(t) - b.point_on(t)).length() < 1e-12);
        }
    }
}

#[test]
fn test_random_splines_are_reproduced() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let degree = rng.gen_range(1..=5);
        let count = degree + 1 + rng.gen_range(0..6);
        let points: Vec<Point2> = (0..count)
            .map(|_| dvec2(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)))
            .collect();
        let mut pool: Vec<u32> = (1..10).collect();
        pool.shuffle(&mut rng);
        let mut interior: Vec<f64> = pool[..count - degree - 1]
            .iter()
            .map(|&k| k as f64 / 10.0)
            .collect();
        interior.sort_by(|a, b| a.total_cmp(b));
        let mut knots = vec![0.0; degree + 1];
        knots.extend(interior);
        knots.extend(std::iter::repeat(1.0).take(degree + 1));

        let spline = if rng.gen_bool(0.5) {
            let weights = (0..count).map(|_| rng.gen_range(0.5..2.0)).collect();
            BSpline::rational(degree, knots, points, weights).unwrap()
        } else {
            BSpline::new(degree, knots, points).unwrap()
        };
        let segments = decompose(&spline).unwrap();
        assert!(!segments.is_empty());
        assert_eq!(segments[0].knot_interval.min, 0.0);
        assert_eq!(segments[segments.len() - 1].knot_interval.max, 1.0);
        assert_joined(&segments);
        assert_reproduces(&spline, &segments);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_malformed_input_is_rejected() {
    let points = wave(4);
    let err = cubic_segments(&[0.0, 0.0, 0.0, 1.0, 1.0], &points, None).unwrap_err();
    assert!(matches!(err, CurveError::InvalidKnotVector(_)));

    let err = cubic_segments(&[0.0, 0.0, 1.0, 0.5, 1.0, 1.0], &points, None).unwrap_err();
    assert!(matches!(err, CurveError::InvalidKnotVector(_)));

    let err = quadratic_segments(&[0.0, 0.0, 1.0, 1.0], &points[..3], Some(&[1.0, 0.0, 1.0]))
        .unwrap_err();
    assert!(matches!(err, CurveError::InvalidKnotVector(_)));
}

#[test]
fn test_interior_knot_beyond_degree_is_rejected() {
    // A triple interior knot in a quadratic leaves a gap between the two halves.
    let knots = [0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0];
    let points = wave(6);
    let err = BSpline::new(2, knots.to_vec(), points.clone()).unwrap_err();
    assert!(matches!(err, CurveError::InvalidKnotVector(_)));
    assert!(quadratic_segments(&knots, &points, None).is_err());

    let err = cubic_segments(
        &[0.0, 0.0, 0.0, 0.4, 0.4, 0.4, 0.4, 1.0, 1.0, 1.0],
        &wave(8),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, CurveError::InvalidKnotVector(_)));
}
