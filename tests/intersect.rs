//! Pairwise intersector invariants and the concrete scenarios of
//! the numerical core's contract.

use bezcore::{IntersectionOutput, Intersector};

fn assert_all_close(nodes1: &[f64], degree1: usize, nodes2: &[f64], degree2: usize, out: &IntersectionOutput) {
    use bezcore::nodes::evaluate;
    for (s, t) in &out.pairs {
        assert!((0.0..=1.0).contains(s));
        assert!((0.0..=1.0).contains(t));
        let p1 = evaluate(degree1, 2, nodes1, &[*s]);
        let p2 = evaluate(degree2, 2, nodes2, &[*t]);
        let dist = ((p1[0] - p2[0]).powi(2) + (p1[1] - p2[1]).powi(2)).sqrt();
        assert!(dist <= 1e-8, "residual {dist} too large for ({s}, {t})");
    }
}

#[test]
fn two_crossing_lines() {
    let nodes1 = [0.0, 0.0, 1.0, 1.0];
    let nodes2 = [0.0, 1.0, 1.0, 0.0];
    let mut engine = Intersector::new();
    let out = engine.curve_intersections(1, &nodes1, 1, &nodes2).unwrap();
    assert_eq!(out.pairs.len(), 1);
    assert_all_close(&nodes1, 1, &nodes2, 1, &out);
    assert!((out.pairs[0].0 - 0.5).abs() < 1e-9);
    assert!((out.pairs[0].1 - 0.5).abs() < 1e-9);
}

#[test]
fn quadratic_crosses_horizontal_line_twice() {
    let nodes1 = [0.0, 0.0, 0.5, 2.0, 1.0, 0.0];
    let nodes2 = [0.0, 0.5, 1.0, 0.5];
    let mut engine = Intersector::new();
    let out = engine.curve_intersections(2, &nodes1, 1, &nodes2).unwrap();
    assert_eq!(out.pairs.len(), 2);
    assert_all_close(&nodes1, 2, &nodes2, 1, &out);
}

#[test]
fn identical_cubics_are_reported_coincident() {
    let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
    let mut engine = Intersector::new();
    let out = engine.curve_intersections(3, &nodes, 3, &nodes).unwrap();
    assert!(out.coincident);
    assert_eq!(out.pairs, vec![(0.0, 0.0), (1.0, 1.0)]);
}

#[test]
fn disjoint_curves_report_zero_intersections() {
    let nodes1 = [0.0, 0.0, 1.0, 0.0];
    let nodes2 = [0.0, 5.0, 1.0, 5.0];
    let mut engine = Intersector::new();
    let out = engine.curve_intersections(1, &nodes1, 1, &nodes2).unwrap();
    assert!(out.pairs.is_empty());
    assert!(!out.coincident);
}

#[test]
fn count_never_exceeds_bezout_bound_for_two_lines() {
    let nodes1 = [0.0, 0.0, 1.0, 3.0];
    let nodes2 = [0.0, 3.0, 1.0, 0.0];
    let mut engine = Intersector::new();
    let out = engine.curve_intersections(1, &nodes1, 1, &nodes2).unwrap();
    // Bezout bound for two degree-1 curves is (1)(1) = 1.
    assert!(out.pairs.len() <= 1);
}

#[test]
fn tangent_circle_arcs_detect_a_double_root_or_report_bad_multiplicity() {
    // Two cubic arcs approximating circles of radius 1 centered at
    // (0,0) and (2,0): tangent at (1,0).
    let k = 0.5522847498;
    let left_circle = [1.0, 0.0, 1.0, k, 1.0 - k, 1.0, 0.0, 1.0];
    let right_circle = [1.0, 1.0, 1.0 + k, 1.0, 2.0, 1.0 - k, 2.0, 0.0];
    let mut engine = Intersector::new();
    match engine.curve_intersections(3, &left_circle, 3, &right_circle) {
        Ok(out) => {
            assert!(out.pairs.len() <= 1);
            if let Some((s, t)) = out.pairs.first() {
                assert!((s - 1.0).abs() < 1e-3);
                assert!((t - 0.0).abs() < 1e-3);
            }
        }
        Err(bezcore::Status::BadMultiplicity) => {}
        Err(other) => panic!("unexpected status for tangent arcs: {other:?}"),
    }
}
