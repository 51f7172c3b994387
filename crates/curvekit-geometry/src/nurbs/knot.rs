//! Knot vector utilities for B-spline evaluation.

/// Find the knot span containing `u`.
///
/// Returns the index `i` in `degree..=last` with `knots[i] <= u < knots[i + 1]`,
/// where `last` is the index of the final control point. Parameters at or past
/// the end of the domain map to the last non-empty span.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - Full knot vector (`last + degree + 2` entries)
/// * `last` - Number of control points minus 1
/// * `u` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], last: usize, u: f64) -> usize {
    if u >= knots[last + 1] {
        // Skip trailing empty spans so the domain end belongs to a real span.
        let mut span = last;
        while span > degree && knots[span] >= knots[span + 1] {
            span -= 1;
        }
        return span;
    }
    if u <= knots[degree] {
        return degree;
    }
    // First knot strictly greater than u, within the interior window.
    let window = &knots[degree + 1..=last + 1];
    degree + window.partition_point(|&k| k <= u)
}

/// Values of the `degree + 1` basis functions that are nonzero on `span`,
/// `N[span - degree], ..., N[span]`, evaluated at `u`.
///
/// Built level by level with the Cox-de Boor recurrence. At level `k` entry `r`
/// holds `N[span - k + r]` of degree `k`; each entry blends the rising ramp of
/// its left neighbour with the falling ramp of itself. `span` must be non-empty,
/// which keeps every ramp's knot difference positive.
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, u: f64) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    values[0] = 1.0;
    for level in 1..=degree {
        for r in (0..=level).rev() {
            let i = span + r - level;
            let rising = match r {
                0 => 0.0,
                _ => values[r - 1] * (u - knots[i]) / (knots[i + level] - knots[i]),
            };
            let falling = if r < level {
                values[r] * (knots[i + level + 1] - u) / (knots[i + level + 1] - knots[i + 1])
            } else {
                0.0
            };
            values[r] = rising + falling;
        }
    }
    values
}

/// Number of times `u` appears in `knots`.
pub fn multiplicity(knots: &[f64], u: f64) -> usize {
    knots.iter().filter(|&&k| k == u).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Quadratic with a double knot at 0.5: spans [0, 0.25), [0.25, 0.5), [0.5, 1).
    const DOUBLE_KNOT: [f64; 9] = [0.0, 0.0, 0.0, 0.25, 0.5, 0.5, 1.0, 1.0, 1.0];

    #[test]
    fn test_find_span_locates_nonempty_spans() {
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 0.0), 2);
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 0.1), 2);
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 0.25), 3);
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 0.4999), 3);
        // The empty span [0.5, 0.5) is skipped.
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 0.5), 5);
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 0.9), 5);
    }

    #[test]
    fn test_domain_end_maps_to_last_real_span() {
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 1.0), 5);
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, 7.0), 5);
        assert_eq!(find_span(2, &DOUBLE_KNOT, 5, -3.0), 2);

        // A fourfold end knot leaves an empty span at the domain end.
        let knots = [0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0];
        assert_eq!(find_span(2, &knots, 4, 1.0), 3);
    }

    #[test]
    fn test_single_span_basis_is_bernstein() {
        let knots = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        for i in 0..=8 {
            let u = i as f64 / 8.0;
            let span = find_span(2, &knots, 2, u);
            let basis = basis_functions(2, &knots, span, u);
            let bernstein = [(1.0 - u) * (1.0 - u), 2.0 * u * (1.0 - u), u * u];
            for (b, expected) in basis.iter().zip(bernstein) {
                assert!((b - expected).abs() < 1e-15, "u={u}: {basis:?}");
            }
        }
    }

    #[test]
    fn test_basis_sums_to_one_across_double_knot() {
        for i in 0..=40 {
            let u = i as f64 / 40.0;
            let span = find_span(2, &DOUBLE_KNOT, 5, u);
            let basis = basis_functions(2, &DOUBLE_KNOT, span, u);
            let sum: f64 = basis.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "u={u}: sum {sum}");
            assert!(basis.iter().all(|&b| b >= 0.0));
        }
        // At a knot of multiplicity `degree` only one function is nonzero.
        let basis = basis_functions(2, &DOUBLE_KNOT, 5, 0.5);
        assert_eq!(basis, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_multiplicity() {
        assert_eq!(multiplicity(&DOUBLE_KNOT, 0.0), 3);
        assert_eq!(multiplicity(&DOUBLE_KNOT, 0.5), 2);
        assert_eq!(multiplicity(&DOUBLE_KNOT, 0.7), 0);
    }
}
