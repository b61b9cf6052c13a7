//! Adaptive subdivision point locator: find the parameter `s` at which
//! a curve passes through a query point, or report that it doesn't.

use crate::bbox;
use crate::newton;
use crate::nodes;

/// Hard cap on subdivision rounds before falling back to the mean of
/// surviving candidate ranges.
pub const MAX_LOCATE_SUBDIVISIONS: usize = 20;

/// Standard-deviation cap (2^-20) on surviving candidate parameter
/// ranges: above this, the query point is considered to lie on
/// multiple disjoint arcs of the curve.
pub const MULTI_ARC_STD_DEV: f64 = 1.0 / (1u64 << 20) as f64;

/// A live candidate sub-arc during point location: a parameter range
/// `[start, end]` together with the control polygon of the original
/// curve restricted to that range.
struct LocateCandidate {
    start: f64,
    end: f64,
    nodes: Vec<f64>,
}

/// The three sentinel outcomes of [`locate_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocateOutcome {
    /// No surviving candidate contained the query point: provably off
    /// the curve.
    NotOnCurve,
    /// Surviving candidates span a parameter spread whose standard
    /// deviation exceeds [`MULTI_ARC_STD_DEV`]: the point lies on
    /// multiple disjoint arcs.
    MultipleArcs,
    /// A single-arc approximate parameter, refined by one Newton step.
    Found(f64),
}

/// Locate the approximate parameter of `point` on the curve described
/// by `degree`/`d`/`nodes`.
///
/// Maintains a list of candidates starting from the whole curve
/// `[0, 1]`; at each of up to [`MAX_LOCATE_SUBDIVISIONS`] rounds, every
/// candidate whose control-polygon bounding box contains `point` is
/// bisected at its midpoint, and candidates that don't are dropped. If
/// every candidate dies in some round, the point is not on the curve.
/// Otherwise the mean and standard deviation of all surviving
/// start/end parameters decide between a genuine multi-arc ambiguity
/// and a single refined answer.
pub fn locate_point(degree: usize, d: usize, nodes: &[f64], point: &[f64]) -> LocateOutcome {
    let n = degree + 1;
    let mut candidates = vec![LocateCandidate { start: 0.0, end: 1.0, nodes: nodes.to_vec() }];

    for _ in 0..MAX_LOCATE_SUBDIVISIONS {
        let mut next = Vec::new();
        for c in &candidates {
            if !bbox::contains_nd(&c.nodes, d, point) {
                continue;
            }
            let (left, right) = nodes::subdivide(n, d, &c.nodes);
            let mid = 0.5 * (c.start + c.end);
            next.push(LocateCandidate { start: c.start, end: mid, nodes: left });
            next.push(LocateCandidate { start: mid, end: c.end, nodes: right });
        }
        if next.is_empty() {
            return LocateOutcome::NotOnCurve;
        }
        candidates = next;
    }

    if candidates.is_empty() {
        return LocateOutcome::NotOnCurve;
    }

    let values: Vec<f64> = candidates.iter().flat_map(|c| [c.start, c.end]).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev > MULTI_ARC_STD_DEV {
        log::debug!("locate_point: std_dev {std_dev} exceeds multi-arc threshold");
        return LocateOutcome::MultipleArcs;
    }

    let refined = newton::refine_locate(degree, d, nodes, point, mean);
    LocateOutcome::Found(refined)
}
