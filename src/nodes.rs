//! Pure algebraic primitives over control polygons.
//!
//! A control polygon is a contiguous column-major `d x N` buffer of
//! `f64`: coordinate `k` of point `i` lives at `nodes[k + i * d]`. Every
//! function here is a free function over plain slices — no owned curve
//! type is exposed, matching the C-callable surface in [`crate::ffi`]
//! which passes exactly these flat buffers across the boundary.

/// Evaluate `m` points on a degree-`degree` curve via the generalized
/// barycentric de Casteljau recursion, for barycentric weight pairs
/// `(lambda1[j], lambda2[j])`.
///
/// `nodes` is `d * (degree + 1)` column-major. Returns a `d * m`
/// column-major buffer. Binomial coefficients are built incrementally
/// (`C(k, i+1) = C(k, i) * (k - i) / (i + 1)`) rather than recomputed
/// from factorials, so the recursion stays well-behaved for degrees up
/// to 255 as required by the nodes-algebra contract.
pub fn evaluate_barycentric(degree: usize, d: usize, nodes: &[f64], lambda1: &[f64], lambda2: &[f64]) -> Vec<f64> {
    let n = degree + 1;
    debug_assert_eq!(nodes.len(), d * n);
    debug_assert_eq!(lambda1.len(), lambda2.len());
    let m = lambda1.len();
    let mut out = vec![0.0; d * m];

    for j in 0..m {
        let l1 = lambda1[j];
        let l2 = lambda2[j];
        let mut binom = 1.0_f64;
        for i in 0..=degree {
            let coeff = binom * l1.powi((degree - i) as i32) * l2.powi(i as i32);
            for k in 0..d {
                out[k + j * d] += coeff * nodes[k + i * d];
            }
            if i < degree {
                binom *= (degree - i) as f64 / (i + 1) as f64;
            }
        }
    }
    out
}

/// Standard parametric evaluation at `s_1..s_m`: a thin wrapper around
/// [`evaluate_barycentric`] with `lambda1 = 1 - s`, `lambda2 = s`.
pub fn evaluate(degree: usize, d: usize, nodes: &[f64], s: &[f64]) -> Vec<f64> {
    let lambda2: Vec<f64> = s.to_vec();
    let lambda1: Vec<f64> = s.iter().map(|v| 1.0 - v).collect();
    evaluate_barycentric(degree, d, nodes, &lambda1, &lambda2)
}

/// The hodograph (derivative curve) of a degree-`degree` curve,
/// evaluated at a single parameter `s`.
///
/// Forms first differences `Delta_i = P_{i+1} - P_i` (a degree-`degree-1`
/// polygon), evaluates the reduced polygon at `s`, and scales by
/// `degree` per `B'(s) = k * H(s)`.
pub fn hodograph(s: f64, degree: usize, d: usize, nodes: &[f64]) -> Vec<f64> {
    debug_assert_eq!(nodes.len(), d * (degree + 1));
    if degree == 0 {
        return vec![0.0; d];
    }
    let mut deltas = vec![0.0; d * degree];
    for i in 0..degree {
        for k in 0..d {
            deltas[k + i * d] = nodes[k + (i + 1) * d] - nodes[k + i * d];
        }
    }
    let mut point = evaluate(degree - 1, d, &deltas, &[s]);
    for v in point.iter_mut() {
        *v *= degree as f64;
    }
    point
}

/// Split a control polygon at `t = 0.5` into `left` and `right` halves,
/// each of length `n`, sharing `left[n-1] == right[0]`.
///
/// Closed-form dyadic formulas are used for `n` in `{2, 3, 4}`; the
/// generic path for `n >= 5` incrementally averages successive Pascal
/// rows (iterated de Casteljau at `t = 0.5`), recording the leading and
/// trailing point of each row as it shrinks.
pub fn subdivide(n: usize, d: usize, nodes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(nodes.len(), d * n);
    match n {
        2 => subdivide_linear(d, nodes),
        3 => subdivide_quadratic(d, nodes),
        4 => subdivide_cubic(d, nodes),
        _ => subdivide_generic(n, d, nodes),
    }
}

fn point(nodes: &[f64], d: usize, i: usize) -> &[f64] {
    &nodes[i * d..(i + 1) * d]
}

fn avg(d: usize, a: &[f64], b: &[f64]) -> Vec<f64> {
    (0..d).map(|k| 0.5 * (a[k] + b[k])).collect()
}

fn avg3(d: usize, a: &[f64], b: &[f64], c: &[f64]) -> Vec<f64> {
    (0..d).map(|k| 0.25 * (a[k] + 2.0 * b[k] + c[k])).collect()
}

fn avg4(d: usize, a: &[f64], b: &[f64], c: &[f64], e: &[f64]) -> Vec<f64> {
    (0..d).map(|k| 0.125 * (a[k] + 3.0 * b[k] + 3.0 * c[k] + e[k])).collect()
}

fn subdivide_linear(d: usize, nodes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let p0 = point(nodes, d, 0);
    let p1 = point(nodes, d, 1);
    let mid = avg(d, p0, p1);
    let mut left = vec![0.0; 2 * d];
    let mut right = vec![0.0; 2 * d];
    left[0..d].copy_from_slice(p0);
    left[d..2 * d].copy_from_slice(&mid);
    right[0..d].copy_from_slice(&mid);
    right[d..2 * d].copy_from_slice(p1);
    (left, right)
}

fn subdivide_quadratic(d: usize, nodes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let p0 = point(nodes, d, 0);
    let p1 = point(nodes, d, 1);
    let p2 = point(nodes, d, 2);
    let m01 = avg(d, p0, p1);
    let m12 = avg(d, p1, p2);
    let mid = avg3(d, p0, p1, p2);
    let mut left = vec![0.0; 3 * d];
    let mut right = vec![0.0; 3 * d];
    left[0..d].copy_from_slice(p0);
    left[d..2 * d].copy_from_slice(&m01);
    left[2 * d..3 * d].copy_from_slice(&mid);
    right[0..d].copy_from_slice(&mid);
    right[d..2 * d].copy_from_slice(&m12);
    right[2 * d..3 * d].copy_from_slice(p2);
    (left, right)
}

fn subdivide_cubic(d: usize, nodes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let p0 = point(nodes, d, 0);
    let p1 = point(nodes, d, 1);
    let p2 = point(nodes, d, 2);
    let p3 = point(nodes, d, 3);
    let q0 = p0.to_vec();
    let q1 = avg(d, p0, p1);
    let q2 = avg3(d, p0, p1, p2);
    let q3 = avg4(d, p0, p1, p2, p3);
    let r1 = avg3(d, p1, p2, p3);
    let r2 = avg(d, p2, p3);
    let r3 = p3.to_vec();
    let mut left = vec![0.0; 4 * d];
    let mut right = vec![0.0; 4 * d];
    left[0..d].copy_from_slice(&q0);
    left[d..2 * d].copy_from_slice(&q1);
    left[2 * d..3 * d].copy_from_slice(&q2);
    left[3 * d..4 * d].copy_from_slice(&q3);
    right[0..d].copy_from_slice(&q3);
    right[d..2 * d].copy_from_slice(&r1);
    right[2 * d..3 * d].copy_from_slice(&r2);
    right[3 * d..4 * d].copy_from_slice(&r3);
    (left, right)
}

fn subdivide_generic(n: usize, d: usize, nodes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut left = vec![0.0; n * d];
    let mut right = vec![0.0; n * d];
    let mut cur = nodes.to_vec();
    let mut cur_len = n;
    for k in 0..n {
        left[k * d..(k + 1) * d].copy_from_slice(&cur[0..d]);
        right[(n - 1 - k) * d..(n - k) * d].copy_from_slice(&cur[(cur_len - 1) * d..cur_len * d]);
        if cur_len > 1 {
            let mut next = vec![0.0; d * (cur_len - 1)];
            for i in 0..cur_len - 1 {
                for c in 0..d {
                    next[c + i * d] = 0.5 * (cur[c + i * d] + cur[c + (i + 1) * d]);
                }
            }
            cur = next;
            cur_len -= 1;
        }
    }
    (left, right)
}

/// One round of de Casteljau reduction with barycentric weights
/// `(w0, w1)`: an `n`-point polygon shrinks to `n - 1` points.
fn de_casteljau_round(d: usize, nodes: &[f64], w0: f64, w1: f64) -> Vec<f64> {
    let n = nodes.len() / d;
    let mut out = vec![0.0; d * (n - 1)];
    for i in 0..n - 1 {
        for k in 0..d {
            out[k + i * d] = w0 * nodes[k + i * d] + w1 * nodes[k + (i + 1) * d];
        }
    }
    out
}

/// Reparameterize a degree-`degree` curve to the subinterval
/// `[start, end] subseteq [0, 1]`, also returning the affine remap of a
/// parent interval `[curve_start, curve_end]` onto the new endpoints.
///
/// Degree 1 is the direct linear blend; degree 2 is the closed-form
/// quadratic blossom triple; higher degrees run the generic two-sweep
/// algorithm: each round applies a `start`-weighted de Casteljau step to
/// seed the next round's first entry and an `end`-weighted step to
/// produce every other entry, alternating between a "start" and "end"
/// sweep until each of the `degree + 1` lanes has collapsed to a single
/// point.
pub fn specialize(degree: usize, d: usize, nodes: &[f64], start: f64, end: f64, curve_start: f64, curve_end: f64) -> (Vec<f64>, f64, f64) {
    debug_assert_eq!(nodes.len(), d * (degree + 1));
    let delta = curve_end - curve_start;
    let true_start = curve_start + start * delta;
    let true_end = curve_start + end * delta;

    let new_nodes = match degree {
        0 => nodes.to_vec(),
        1 => {
            let p0 = point(nodes, d, 0);
            let p1 = point(nodes, d, 1);
            let mut out = vec![0.0; 2 * d];
            for k in 0..d {
                out[k] = p0[k] + (p1[k] - p0[k]) * start;
                out[d + k] = p0[k] + (p1[k] - p0[k]) * end;
            }
            out
        }
        2 => {
            let p0 = point(nodes, d, 0);
            let p1 = point(nodes, d, 1);
            let p2 = point(nodes, d, 2);
            let q_at = |t: f64, k: usize| {
                let one_t = 1.0 - t;
                one_t * one_t * p0[k] + 2.0 * one_t * t * p1[k] + t * t * p2[k]
            };
            let mut out = vec![0.0; 3 * d];
            for k in 0..d {
                out[k] = q_at(start, k);
                out[2 * d + k] = q_at(end, k);
                out[d + k] = (1.0 - start) * (1.0 - end) * p0[k] + (start + end - 2.0 * start * end) * p1[k] + start * end * p2[k];
            }
            out
        }
        _ => specialize_generic(degree, d, nodes, start, end),
    };
    (new_nodes, true_start, true_end)
}

fn specialize_generic(degree: usize, d: usize, nodes: &[f64], start: f64, end: f64) -> Vec<f64> {
    // `lanes[j]` holds the partial blossom evaluation for the
    // non-decreasing 0/1 sequence with `j` trailing `end`-weighted
    // sweeps (and the rest `start`-weighted). At round r it has r+1
    // entries of length d*(n-r) each.
    let mut lanes: Vec<Vec<f64>> = vec![nodes.to_vec()];
    for r in 1..=degree {
        let mut next: Vec<Vec<f64>> = Vec::with_capacity(r + 1);
        next.push(de_casteljau_round(d, &lanes[0], 1.0 - start, start));
        for j in 1..=r {
            next.push(de_casteljau_round(d, &lanes[j - 1], 1.0 - end, end));
        }
        lanes = next;
    }
    let mut out = vec![0.0; d * (degree + 1)];
    for (j, lane) in lanes.into_iter().enumerate() {
        out[j * d..(j + 1) * d].copy_from_slice(&lane);
    }
    out
}

/// Degree-elevate an `n`-point control polygon to `n + 1` points,
/// preserving the curve's point-set: `Q_j = (j/n) P_{j-1} + (1 - j/n) P_j`
/// with `P_{-1}` and `P_n` contributing zero weight at the boundaries.
pub fn elevate(n: usize, d: usize, nodes: &[f64]) -> Vec<f64> {
    debug_assert_eq!(nodes.len(), d * n);
    let nf = n as f64;
    let mut out = vec![0.0; d * (n + 1)];
    for j in 0..=n {
        let wj = j as f64 / nf;
        for k in 0..d {
            let prev = if j == 0 { 0.0 } else { nodes[k + (j - 1) * d] };
            let cur = if j == n { 0.0 } else { nodes[k + j * d] };
            out[k + j * d] = wj * prev + (1.0 - wj) * cur;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_endpoints_recover_control_points() {
        let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
        let degree = 3;
        let d = 2;
        let start = evaluate(degree, d, &nodes, &[0.0]);
        let end = evaluate(degree, d, &nodes, &[1.0]);
        assert!((start[0] - 0.0).abs() < 1e-14 && (start[1] - 0.0).abs() < 1e-14);
        assert!((end[0] - 4.0).abs() < 1e-14 && (end[1] - 4.0).abs() < 1e-14);
    }

    #[test]
    fn subdivide_shares_midpoint() {
        // [(0,0),(1,2),(3,1),(4,4)] split at 0.5
        let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
        let (left, right) = subdivide(4, 2, &nodes);
        let left_last = &left[3 * 2..4 * 2];
        let right_first = &right[0..2];
        assert!((left_last[0] - right_first[0]).abs() < 1e-12);
        assert!((left_last[1] - right_first[1]).abs() < 1e-12);
        assert!((left_last[0] - 1.75).abs() < 1e-12);
        assert!((left_last[1] - 1.875).abs() < 1e-12);
    }

    #[test]
    fn subdivide_generic_matches_closed_form_for_cubic() {
        let nodes = [0.1, -0.2, 1.3, 2.4, 3.9, -1.2, 4.4, 4.9];
        let (left_cf, right_cf) = subdivide_cubic(2, &nodes);
        let (left_g, right_g) = subdivide_generic(4, 2, &nodes);
        for i in 0..left_cf.len() {
            assert!((left_cf[i] - left_g[i]).abs() < 1e-12);
            assert!((right_cf[i] - right_g[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn elevate_preserves_point_set() {
        let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
        let degree = 3;
        let d = 2;
        let elevated = elevate(4, d, &nodes);
        for i in 0..=20 {
            let s = i as f64 / 20.0;
            let p1 = evaluate(degree, d, &nodes, &[s]);
            let p2 = evaluate(degree + 1, d, &elevated, &[s]);
            assert!((p1[0] - p2[0]).abs() < 1e-10);
            assert!((p1[1] - p2[1]).abs() < 1e-10);
        }
    }

    #[test]
    fn specialize_full_interval_is_identity() {
        let nodes = [0.1, -0.2, 1.3, 2.4, 3.9, -1.2, 4.4, 4.9];
        let (new_nodes, ts, te) = specialize(3, 2, &nodes, 0.0, 1.0, 0.0, 1.0);
        for i in 0..nodes.len() {
            assert!((new_nodes[i] - nodes[i]).abs() < 1e-10);
        }
        assert!((ts - 0.0).abs() < 1e-14);
        assert!((te - 1.0).abs() < 1e-14);
    }

    #[test]
    fn specialize_commutes_with_evaluate() {
        let nodes = [0.1, -0.2, 1.3, 2.4, 3.9, -1.2, 4.4, 4.9];
        let degree = 3;
        let d = 2;
        let (start, end) = (0.2, 0.8);
        let (sub, _, _) = specialize(degree, d, &nodes, start, end, 0.0, 1.0);
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let direct = evaluate(degree, d, &nodes, &[start + u * (end - start)]);
            let via_sub = evaluate(degree, d, &sub, &[u]);
            assert!((direct[0] - via_sub[0]).abs() < 1e-9);
            assert!((direct[1] - via_sub[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn hodograph_matches_finite_difference() {
        let nodes = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
        let degree = 3;
        let d = 2;
        let s = 0.37;
        let dt = 1e-6;
        let deriv = hodograph(s, degree, d, &nodes);
        let p0 = evaluate(degree, d, &nodes, &[s]);
        let p1 = evaluate(degree, d, &nodes, &[s + dt]);
        for k in 0..d {
            let fd = (p1[k] - p0[k]) / dt;
            assert!((fd - deriv[k]).abs() < 1e-3);
        }
    }
}
