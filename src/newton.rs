//! Newton refinement: single-curve (point locator) and curve-pair
//! (pairwise intersector) variants, plus convergence-pattern
//! classification used to detect double roots.

use crate::nodes;
use crate::status::{BezResult, Status};

/// One Newton step refining a single-curve parameter `s` towards the
/// query point `p`: `s + (delta . D) / (D . D)` where `delta = p - B(s)`
/// and `D = B'(s)`. The caller iterates if more precision is needed;
/// there is no status output for this variant.
pub fn refine_locate(degree: usize, d: usize, nodes: &[f64], p: &[f64], s: f64) -> f64 {
    let b = nodes::evaluate(degree, d, nodes, &[s]);
    let deriv = nodes::hodograph(s, degree, d, nodes);
    let mut delta_dot_d = 0.0;
    let mut d_dot_d = 0.0;
    for k in 0..d {
        let delta_k = p[k] - b[k];
        delta_dot_d += delta_k * deriv[k];
        d_dot_d += deriv[k] * deriv[k];
    }
    if d_dot_d == 0.0 {
        return s;
    }
    s + delta_dot_d / d_dot_d
}

/// One Newton step solving `F(s, t) = B1(s) - B2(t) = 0` for the 2D
/// curve pair, given the current guess `(s, t)`.
///
/// The 2x2 Jacobian has columns `B1'(s)` and `-B2'(t)`. Returns
/// [`Status::Singular`] (outputs unspecified) when `|det|` falls at or
/// below a machine-precision-scaled threshold.
pub fn refine_pair(s: f64, degree1: usize, nodes1: &[f64], t: f64, degree2: usize, nodes2: &[f64]) -> BezResult<(f64, f64)> {
    let b1 = nodes::evaluate(degree1, 2, nodes1, &[s]);
    let b2 = nodes::evaluate(degree2, 2, nodes2, &[t]);
    let d1 = nodes::hodograph(s, degree1, 2, nodes1);
    let d2 = nodes::hodograph(t, degree2, 2, nodes2);

    let f0 = b1[0] - b2[0];
    let f1 = b1[1] - b2[1];

    // Jacobian columns: j0 = d1, j1 = -d2.
    let j0x = d1[0];
    let j0y = d1[1];
    let j1x = -d2[0];
    let j1y = -d2[1];

    let det = j0x * j1y - j1x * j0y;
    let threshold = 1e-12 * (j0x.abs() + j0y.abs() + j1x.abs() + j1y.abs() + 1.0);
    if det.abs() <= threshold {
        return Err(Status::Singular);
    }

    let ds = (j1y * f0 - j1x * f1) / det;
    let dt = (-j0y * f0 + j0x * f1) / det;
    Ok((s - ds, t - dt))
}

/// The outcome of iterating [`refine_pair`] to classify the local root
/// multiplicity, as used by the pairwise intersector after subdivision
/// has localized a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    /// Converged with the expected quadratic rate of a simple root.
    Simple { s: f64, t: f64 },
    /// Converged at the characteristic linear rate (~1/2) of a double
    /// root, after applying the standard multiplicity-2 acceleration.
    Double { s: f64, t: f64 },
}

const RESIDUAL_TOL: f64 = 1e-12;
const MAX_CLASSIFY_ITERS: usize = 50;

fn residual_norm(s: f64, degree1: usize, nodes1: &[f64], t: f64, degree2: usize, nodes2: &[f64]) -> f64 {
    let b1 = nodes::evaluate(degree1, 2, nodes1, &[s]);
    let b2 = nodes::evaluate(degree2, 2, nodes2, &[t]);
    ((b1[0] - b2[0]).powi(2) + (b1[1] - b2[1]).powi(2)).sqrt()
}

/// Iterate [`refine_pair`] from `(s0, t0)`, classifying the observed
/// convergence rate. A simple root shows quadratic convergence and is
/// accepted as soon as the residual drops below tolerance. A double
/// root shows linear convergence at rate ~= 1/2; once that pattern is
/// recognized, Aitken's delta-squared acceleration (the standard
/// double-root speed-up) is applied componentwise. If neither pattern
/// is observed within the iteration budget, returns
/// [`Status::BadMultiplicity`].
pub fn classify_convergence(s0: f64, degree1: usize, nodes1: &[f64], t0: f64, degree2: usize, nodes2: &[f64]) -> BezResult<Convergence> {
    let mut s = s0;
    let mut t = t0;
    let mut prev_residual = residual_norm(s, degree1, nodes1, t, degree2, nodes2);
    let mut halving_streak = 0;

    for _ in 0..MAX_CLASSIFY_ITERS {
        if prev_residual <= RESIDUAL_TOL {
            return Ok(Convergence::Simple { s, t });
        }
        let (s_prev, t_prev) = (s, t);
        let (s1, t1) = refine_pair(s, degree1, nodes1, t, degree2, nodes2)?;
        let residual = residual_norm(s1, degree1, nodes1, t1, degree2, nodes2);

        if residual <= RESIDUAL_TOL {
            return Ok(Convergence::Simple { s: s1, t: t1 });
        }

        let ratio = if prev_residual > 0.0 { residual / prev_residual } else { 0.0 };
        if ratio < 0.1 {
            // Clearly quadratic: keep iterating a simple-root refinement.
            halving_streak = 0;
            s = s1;
            t = t1;
            prev_residual = residual;
            continue;
        }

        if (0.35..=0.65).contains(&ratio) {
            halving_streak += 1;
        } else {
            halving_streak = 0;
        }

        if halving_streak >= 3 {
            // Aitken's delta-squared extrapolation for the classic
            // double-root linear-convergence acceleration.
            let denom_s = s1 - 2.0 * s_prev + s0;
            let denom_t = t1 - 2.0 * t_prev + t0;
            let s_acc = if denom_s.abs() > f64::EPSILON { s1 - (s1 - s_prev).powi(2) / denom_s } else { s1 };
            let t_acc = if denom_t.abs() > f64::EPSILON { t1 - (t1 - t_prev).powi(2) / denom_t } else { t1 };
            let acc_residual = residual_norm(s_acc, degree1, nodes1, t_acc, degree2, nodes2);
            if acc_residual <= RESIDUAL_TOL.sqrt() {
                return Ok(Convergence::Double { s: s_acc, t: t_acc });
            }
            s = s_acc;
            t = t_acc;
            halving_streak = 0;
        } else {
            s = s1;
            t = t1;
        }
        prev_residual = residual;
    }

    Err(Status::BadMultiplicity)
}
