//! The pairwise intersector: the main engine. Subdivides two planar
//! curves in lock-step, prunes by bounding-box/convex-hull overlap,
//! detects linearization, solves linear/linear crossings, refines
//! near-candidates by Newton, and post-processes to deduplicate,
//! detect tangencies, and detect coincident arcs.

use crate::bbox::{self, BBox, Overlap};
use crate::newton::{self, Convergence};
use crate::nodes;
use crate::status::{BezResult, Status, CANDIDATE_BLOWUP};
use crate::workspace::{IntersectCandidate, Workspace};

/// Hard cap on subdivision rounds before declaring non-convergence.
pub const MAX_SUBDIVISIONS: usize = 20;

const LINEAR_REL_TOL: f64 = 1e-7;
const COINCIDENCE_TOL: f64 = 1e-7;
const DEDUP_TOL: f64 = 1e-7;
const PARAM_EPS: f64 = 1e-7;

/// The outcome of a successful [`Intersector::curve_intersections`]
/// call: unique `(s, t)` parameter pairs, and whether the curves were
/// found to be coincident (in which case `pairs` has exactly two
/// entries marking the shared arc's start and end).
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionOutput {
    pub pairs: Vec<(f64, f64)>,
    pub coincident: bool,
}

/// Owns the growable double-buffered candidate workspace for repeated
/// pairwise intersection calls.
///
/// Single-threaded and synchronous like the rest of the core: a
/// multithreaded consumer should give each thread its own
/// `Intersector` or guard a shared one with a mutex, rather than rely
/// on any internal synchronization (there is none, by design, to keep
/// the inner loop cache-local).
#[derive(Default)]
pub struct Intersector {
    workspace: Workspace,
}

impl Intersector {
    pub fn new() -> Self {
        Intersector { workspace: Workspace::new() }
    }

    /// Release the workspace's backing allocations. The Rust-level
    /// equivalent of `BEZ_free_curve_intersections_workspace`.
    pub fn clear(&mut self) {
        self.workspace.clear();
    }

    /// Find every parameter pair `(s, t)` with `B1(s) ~= B2(t)` for two
    /// planar control polygons of degree `degree1`/`degree2`.
    pub fn curve_intersections(&mut self, degree1: usize, nodes1: &[f64], degree2: usize, nodes2: &[f64]) -> BezResult<IntersectionOutput> {
        if let Some((start, end)) = detect_coincidence(degree1, nodes1, degree2, nodes2) {
            log::debug!("curve_intersections: detected coincident arc {:?}..{:?}", start, end);
            return Ok(IntersectionOutput { pairs: vec![start, end], coincident: true });
        }

        let n1 = degree1 + 1;
        let n2 = degree2 + 1;
        self.workspace.seed(IntersectCandidate { s_range: (0.0, 1.0), t_range: (0.0, 1.0), nodes1: nodes1.to_vec(), nodes2: nodes2.to_vec() });

        let mut solved: Vec<(f64, f64)> = Vec::new();
        let mut tangent_touch: Vec<IntersectCandidate> = Vec::new();
        let mut needs_more_subdivision = false;

        for round in 0..MAX_SUBDIVISIONS {
            let current = core::mem::take(&mut self.workspace.current);
            if current.is_empty() {
                break;
            }
            log::trace!("curve_intersections: round {round}, {} live candidates", current.len());

            for cand in current {
                let bb1 = BBox::of_control_polygon(&cand.nodes1);
                let bb2 = BBox::of_control_polygon(&cand.nodes2);
                match bbox::classify(&bb1, &bb2) {
                    Overlap::Disjoint => continue,
                    Overlap::Tangent => {
                        tangent_touch.push(cand);
                        continue;
                    }
                    Overlap::Intersection => {
                        if !convex_hulls_overlap(&cand.nodes1, &cand.nodes2) {
                            continue;
                        }
                        let lin1 = is_linear(&cand.nodes1, n1);
                        let lin2 = is_linear(&cand.nodes2, n2);
                        if lin1 && lin2 {
                            if let Some((sl, tl)) = linear_solve(&cand.nodes1, n1, &cand.nodes2, n2) {
                                let s = remap(cand.s_range, sl);
                                let t = remap(cand.t_range, tl);
                                solved.push((s, t));
                            }
                            continue;
                        }

                        needs_more_subdivision = round == MAX_SUBDIVISIONS - 1;
                        let (l1, r1) = nodes::subdivide(n1, 2, &cand.nodes1);
                        let (l2, r2) = nodes::subdivide(n2, 2, &cand.nodes2);
                        let sm = 0.5 * (cand.s_range.0 + cand.s_range.1);
                        let tm = 0.5 * (cand.t_range.0 + cand.t_range.1);
                        self.workspace.push_next(IntersectCandidate { s_range: (cand.s_range.0, sm), t_range: (cand.t_range.0, tm), nodes1: l1.clone(), nodes2: l2.clone() });
                        self.workspace.push_next(IntersectCandidate { s_range: (cand.s_range.0, sm), t_range: (tm, cand.t_range.1), nodes1: l1, nodes2: r2.clone() });
                        self.workspace.push_next(IntersectCandidate { s_range: (sm, cand.s_range.1), t_range: (cand.t_range.0, tm), nodes1: r1.clone(), nodes2: l2 });
                        self.workspace.push_next(IntersectCandidate { s_range: (sm, cand.s_range.1), t_range: (tm, cand.t_range.1), nodes1: r1, nodes2: r2 });
                    }
                }
            }

            self.workspace.advance_round();
        }

        if self.workspace.current.len() >= CANDIDATE_BLOWUP {
            let n = self.workspace.current.len();
            log::warn!("curve_intersections: candidate blow-up, {n} surviving candidates after the final round");
            return Err(Status::TooManyCandidates(n));
        }

        if needs_more_subdivision {
            log::debug!("curve_intersections: candidates failed to linearize within {MAX_SUBDIVISIONS} rounds");
            return Err(Status::NoConverge);
        }

        let mut guesses: Vec<(f64, f64)> = solved;
        for cand in &tangent_touch {
            guesses.push((0.5 * (cand.s_range.0 + cand.s_range.1), 0.5 * (cand.t_range.0 + cand.t_range.1)));
        }

        let mut refined = Vec::with_capacity(guesses.len());
        for (s0, t0) in guesses {
            let (s, t) = match newton::classify_convergence(s0, degree1, nodes1, t0, degree2, nodes2)? {
                Convergence::Simple { s, t } => (s, t),
                Convergence::Double { s, t } => (s, t),
            };
            if (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&s) && (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&t) {
                refined.push((s.clamp(0.0, 1.0), t.clamp(0.0, 1.0)));
            }
        }

        Ok(IntersectionOutput { pairs: dedup_pairs(refined, DEDUP_TOL), coincident: false })
    }
}

fn point2(nodes: &[f64], i: usize) -> [f64; 2] {
    [nodes[i * 2], nodes[i * 2 + 1]]
}

fn remap(range: (f64, f64), local: f64) -> f64 {
    range.0 + local * (range.1 - range.0)
}

fn point_to_line_distance(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-15 {
        return ((p[0] - a[0]).powi(2) + (p[1] - a[1]).powi(2)).sqrt();
    }
    ((p[0] - a[0]) * dy - (p[1] - a[1]) * dx).abs() / len
}

/// The control polygon is "close enough" to its chord when every
/// interior control point's deviation falls below a scale-aware
/// threshold (relative to the chord length, never smaller than an
/// absolute floor).
fn is_linear(nodes: &[f64], n: usize) -> bool {
    if n <= 2 {
        return true;
    }
    let start = point2(nodes, 0);
    let end = point2(nodes, n - 1);
    let chord_len = ((end[0] - start[0]).powi(2) + (end[1] - start[1]).powi(2)).sqrt();
    let tol = LINEAR_REL_TOL * chord_len.max(1.0);
    (1..n - 1).all(|i| point_to_line_distance(point2(nodes, i), start, end) <= tol)
}

/// Solve the straight-line crossing of two candidates already
/// classified as linear, using only their chord endpoints (the
/// interior control points are, by the linearization test, within
/// tolerance of that chord).
fn linear_solve(nodes1: &[f64], n1: usize, nodes2: &[f64], n2: usize) -> Option<(f64, f64)> {
    let p0 = point2(nodes1, 0);
    let p1 = point2(nodes1, n1 - 1);
    let q0 = point2(nodes2, 0);
    let q1 = point2(nodes2, n2 - 1);

    let a = p1[0] - p0[0];
    let c = p1[1] - p0[1];
    let b = -(q1[0] - q0[0]);
    let d = -(q1[1] - q0[1]);
    let det = a * d - b * c;
    if det.abs() < 1e-14 {
        return None;
    }
    let rhs0 = q0[0] - p0[0];
    let rhs1 = q0[1] - p0[1];
    let s = (rhs0 * d - b * rhs1) / det;
    let t = (a * rhs1 - c * rhs0) / det;
    if (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&s) && (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&t) {
        Some((s.clamp(0.0, 1.0), t.clamp(0.0, 1.0)))
    } else {
        None
    }
}

fn dedup_pairs(pairs: Vec<(f64, f64)>, tol: f64) -> Vec<(f64, f64)> {
    let mut result: Vec<(f64, f64)> = Vec::new();
    for p in pairs {
        if !result.iter().any(|r: &(f64, f64)| (p.0 - r.0).abs() < tol && (p.1 - r.1).abs() < tol) {
            result.push(p);
        }
    }
    result
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Andrew's monotone-chain convex hull of a set of 2D points.
fn convex_hull(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap().then(a[1].partial_cmp(&b[1]).unwrap()));
    pts.dedup_by(|a, b| (a[0] - b[0]).abs() < 1e-15 && (a[1] - b[1]).abs() < 1e-15);
    if pts.len() <= 2 {
        return pts;
    }

    let mut lower: Vec<[f64; 2]> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<[f64; 2]> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn project(poly: &[[f64; 2]], axis: [f64; 2]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in poly {
        let d = p[0] * axis[0] + p[1] * axis[1];
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Separating-axis test between the convex hulls of two control
/// polygons: a tighter overlap test than the bounding-box classifier,
/// consulted once a candidate's boxes are classified `Intersection`.
fn convex_hulls_overlap(nodes1: &[f64], nodes2: &[f64]) -> bool {
    let pts1: Vec<[f64; 2]> = nodes1.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
    let pts2: Vec<[f64; 2]> = nodes2.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
    let hull1 = convex_hull(&pts1);
    let hull2 = convex_hull(&pts2);

    if hull1.len() == 1 && hull2.len() == 1 {
        return (hull1[0][0] - hull2[0][0]).abs() < 1e-12 && (hull1[0][1] - hull2[0][1]).abs() < 1e-12;
    }

    for hull in [&hull1, &hull2] {
        if hull.len() < 2 {
            continue;
        }
        let n = hull.len();
        for i in 0..n {
            let p1 = hull[i];
            let p2 = hull[(i + 1) % n];
            let axis = [-(p2[1] - p1[1]), p2[0] - p1[0]];
            let (amin, amax) = project(&hull1, axis);
            let (bmin, bmax) = project(&hull2, axis);
            if amax < bmin || bmax < amin {
                return false;
            }
        }
    }
    true
}

fn elevate_to(degree: usize, d: usize, nodes: &[f64], target_degree: usize) -> Vec<f64> {
    let mut cur = nodes.to_vec();
    let mut cur_degree = degree;
    while cur_degree < target_degree {
        cur = nodes::elevate(cur_degree + 1, d, &cur);
        cur_degree += 1;
    }
    cur
}

fn reverse_nodes(nodes: &[f64], n: usize, d: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * d];
    for i in 0..n {
        out[i * d..(i + 1) * d].copy_from_slice(&nodes[(n - 1 - i) * d..(n - i) * d]);
    }
    out
}

fn nodes_close(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
}

/// Detect whether two curves are arcs of a common algebraic curve, up
/// to reparameterization by an affine map on the parameter domain.
///
/// Both curves are degree-elevated to a common degree so their control
/// polygons are directly comparable. Three reparameterizations are
/// tried: identity, full reversal, and a partial-overlap affine map
/// derived by locating each curve's endpoints on the other.
fn detect_coincidence(degree1: usize, nodes1: &[f64], degree2: usize, nodes2: &[f64]) -> Option<((f64, f64), (f64, f64))> {
    let target = degree1.max(degree2);
    let e1 = elevate_to(degree1, 2, nodes1, target);
    let e2 = elevate_to(degree2, 2, nodes2, target);
    let n = target + 1;

    if nodes_close(&e1, &e2, COINCIDENCE_TOL) {
        return Some(((0.0, 0.0), (1.0, 1.0)));
    }

    let e2_rev = reverse_nodes(&e2, n, 2);
    if nodes_close(&e1, &e2_rev, COINCIDENCE_TOL) {
        return Some(((0.0, 1.0), (1.0, 0.0)));
    }

    use crate::locate::{locate_point, LocateOutcome};
    let t0_point = nodes::evaluate(degree2, 2, nodes2, &[0.0]);
    let t1_point = nodes::evaluate(degree2, 2, nodes2, &[1.0]);
    let (LocateOutcome::Found(s0), LocateOutcome::Found(s1)) = (locate_point(degree1, 2, nodes1, &t0_point), locate_point(degree1, 2, nodes1, &t1_point)) else {
        return None;
    };
    if (s1 - s0).abs() < 1e-9 {
        return None;
    }

    let (lo, hi, reversed) = if s0 <= s1 { (s0, s1, false) } else { (s1, s0, true) };
    let (sub1, _, _) = nodes::specialize(degree1, 2, nodes1, lo, hi, 0.0, 1.0);
    let e_sub1 = elevate_to(degree1, 2, &sub1, target);
    let candidate = if reversed { reverse_nodes(&e2, n, 2) } else { e2 };
    if nodes_close(&e_sub1, &candidate, COINCIDENCE_TOL) {
        Some(((s0, 0.0), (s1, 1.0)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_lines() {
        let nodes1 = [0.0, 0.0, 1.0, 1.0];
        let nodes2 = [0.0, 1.0, 1.0, 0.0];
        let mut engine = Intersector::new();
        let out = engine.curve_intersections(1, &nodes1, 1, &nodes2).unwrap();
        assert!(!out.coincident);
        assert_eq!(out.pairs.len(), 1);
        let (s, t) = out.pairs[0];
        assert!((s - 0.5).abs() < 1e-9);
        assert!((t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn quadratic_vs_horizontal_line() {
        // B(s) = (s, 4s(1-s)) crosses y=0.5 at s = (2 +- sqrt(2)) / 4.
        let nodes1 = [0.0, 0.0, 0.5, 2.0, 1.0, 0.0];
        let nodes2 = [0.0, 0.5, 1.0, 0.5];
        let mut engine = Intersector::new();
        let out = engine.curve_intersections(2, &nodes1, 1, &nodes2).unwrap();
        assert_eq!(out.pairs.len(), 2);
        let expected_lo = (2.0 - 2.0_f64.sqrt()) / 4.0;
        let expected_hi = (2.0 + 2.0_f64.sqrt()) / 4.0;
        let mut sorted = out.pairs.clone();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert!((sorted[0].0 - expected_lo).abs() < 1e-6);
        assert!((sorted[1].0 - expected_hi).abs() < 1e-6);
        for (s, t) in &sorted {
            assert!((s - t).abs() < 1e-6);
        }
    }

    #[test]
    fn identical_cubics_are_coincident() {
        let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
        let mut engine = Intersector::new();
        let out = engine.curve_intersections(3, &nodes, 3, &nodes).unwrap();
        assert!(out.coincident);
        assert_eq!(out.pairs, vec![(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn disjoint_curves_have_no_intersections() {
        let nodes1 = [0.0, 0.0, 1.0, 1.0];
        let nodes2 = [10.0, 10.0, 11.0, 11.0];
        let mut engine = Intersector::new();
        let out = engine.curve_intersections(1, &nodes1, 1, &nodes2).unwrap();
        assert!(out.pairs.is_empty());
        assert!(!out.coincident);
    }
}
