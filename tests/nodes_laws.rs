//! Round-trip and algebraic laws for the nodes algebra, checked over
//! random control polygons and parameters.

use bezcore::nodes;
use proptest::prelude::*;

fn arb_polygon(n: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-10.0..10.0_f64, 2 * n)
}

proptest! {
    #[test]
    fn specialize_commutes_with_evaluate(polygon in arb_polygon(4), u in 0.0..1.0_f64) {
        let degree = 3;
        let d = 2;
        let (sub, _, _) = nodes::specialize(degree, d, &polygon, 0.2, 0.9, 0.0, 1.0);
        let direct = nodes::evaluate(degree, d, &polygon, &[0.2 + u * 0.7]);
        let via_sub = nodes::evaluate(degree, d, &sub, &[u]);
        prop_assert!((direct[0] - via_sub[0]).abs() < 1e-7);
        prop_assert!((direct[1] - via_sub[1]).abs() < 1e-7);
    }

    #[test]
    fn subdivide_shares_midpoint_and_matches_halves(polygon in arb_polygon(4), u in 0.0..1.0_f64) {
        let degree = 3;
        let d = 2;
        let (left, right) = nodes::subdivide(4, d, &polygon);
        prop_assert!((left[6] - right[0]).abs() < 1e-9);
        prop_assert!((left[7] - right[1]).abs() < 1e-9);

        let whole_left = nodes::evaluate(degree, d, &polygon, &[u / 2.0]);
        let left_eval = nodes::evaluate(degree, d, &left, &[u]);
        prop_assert!((whole_left[0] - left_eval[0]).abs() < 1e-9);
        prop_assert!((whole_left[1] - left_eval[1]).abs() < 1e-9);

        let whole_right = nodes::evaluate(degree, d, &polygon, &[(1.0 + u) / 2.0]);
        let right_eval = nodes::evaluate(degree, d, &right, &[u]);
        prop_assert!((whole_right[0] - right_eval[0]).abs() < 1e-9);
        prop_assert!((whole_right[1] - right_eval[1]).abs() < 1e-9);
    }

    #[test]
    fn elevate_preserves_point_set(polygon in arb_polygon(4), u in 0.0..1.0_f64) {
        let degree = 3;
        let d = 2;
        let elevated = nodes::elevate(4, d, &polygon);
        let p1 = nodes::evaluate(degree, d, &polygon, &[u]);
        let p2 = nodes::evaluate(degree + 1, d, &elevated, &[u]);
        prop_assert!((p1[0] - p2[0]).abs() < 1e-9);
        prop_assert!((p1[1] - p2[1]).abs() < 1e-9);
    }

    #[test]
    fn hodograph_matches_finite_difference(polygon in arb_polygon(4), s in 0.01..0.99_f64) {
        let degree = 3;
        let d = 2;
        let dt = 1e-6;
        let deriv = nodes::hodograph(s, degree, d, &polygon);
        let p0 = nodes::evaluate(degree, d, &polygon, &[s]);
        let p1 = nodes::evaluate(degree, d, &polygon, &[s + dt]);
        for k in 0..d {
            let fd = (p1[k] - p0[k]) / dt;
            prop_assert!((fd - deriv[k]).abs() < 1e-2);
        }
    }
}

#[test]
fn subdivide_worked_example() {
    let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
    let (left, right) = nodes::subdivide(4, 2, &nodes);
    assert!((left[6] - 1.75).abs() < 1e-12);
    assert!((left[7] - 1.875).abs() < 1e-12);
    assert!((right[0] - 1.75).abs() < 1e-12);
    assert!((right[1] - 1.875).abs() < 1e-12);
}
