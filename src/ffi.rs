//! C-callable surface: flat column-major `f64` arrays in, flat arrays
//! and out-parameters out. Every function here is a thin unsafe shim —
//! all real work happens in the safe sibling modules.
//!
//! Array layout is column-major (`d` varies fastest). Parameter domains
//! are `[0, 1]`. No environment variables, no persisted state, no
//! configuration file: the only process-wide resource this boundary
//! manages is the intersector's candidate workspace (see
//! [`bez_free_curve_intersections_workspace`]).

use std::slice;
use std::sync::{Mutex, OnceLock};

use crate::bbox::{self, BBox};
use crate::intersect::Intersector;
use crate::locate::{self, LocateOutcome};
use crate::newton;
use crate::nodes;
use crate::status::{Status, SUCCESS};

fn intersector() -> &'static Mutex<Intersector> {
    static INSTANCE: OnceLock<Mutex<Intersector>> = OnceLock::new();
    INSTANCE.get_or_init(|| Mutex::new(Intersector::new()))
}

/// # Safety
/// `nodes` must point to `d * (degree + 1)` readable `f64`s; `lambda1`
/// and `lambda2` must each point to `m` readable `f64`s; `evaluated`
/// must point to `d * m` writable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn bez_evaluate_curve_barycentric(degree: usize, d: usize, nodes: *const f64, m: usize, lambda1: *const f64, lambda2: *const f64, evaluated: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * (degree + 1));
    let lambda1 = slice::from_raw_parts(lambda1, m);
    let lambda2 = slice::from_raw_parts(lambda2, m);
    let out = nodes::evaluate_barycentric(degree, d, nodes, lambda1, lambda2);
    slice::from_raw_parts_mut(evaluated, d * m).copy_from_slice(&out);
}

/// # Safety
/// `nodes` must point to `d * (degree + 1)` readable `f64`s; `s` must
/// point to `m` readable `f64`s; `evaluated` must point to `d * m`
/// writable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn bez_evaluate_multi(degree: usize, d: usize, nodes: *const f64, m: usize, s: *const f64, evaluated: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * (degree + 1));
    let s = slice::from_raw_parts(s, m);
    let out = nodes::evaluate(degree, d, nodes, s);
    slice::from_raw_parts_mut(evaluated, d * m).copy_from_slice(&out);
}

/// # Safety
/// `nodes` must point to `d * (degree + 1)` readable `f64`s;
/// `new_nodes` must point to `d * (degree + 1)` writable `f64`s;
/// `true_start` and `true_end` must each point to one writable `f64`.
#[no_mangle]
pub unsafe extern "C" fn bez_specialize_curve(degree: usize, d: usize, nodes: *const f64, start: f64, end: f64, curve_start: f64, curve_end: f64, new_nodes: *mut f64, true_start: *mut f64, true_end: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * (degree + 1));
    let (out, ts, te) = nodes::specialize(degree, d, nodes, start, end, curve_start, curve_end);
    slice::from_raw_parts_mut(new_nodes, d * (degree + 1)).copy_from_slice(&out);
    *true_start = ts;
    *true_end = te;
}

/// # Safety
/// `nodes` must point to `d * (degree + 1)` readable `f64`s;
/// `hodograph` must point to `d` writable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn bez_evaluate_hodograph(s: f64, degree: usize, d: usize, nodes: *const f64, hodograph: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * (degree + 1));
    let out = nodes::hodograph(s, degree, d, nodes);
    slice::from_raw_parts_mut(hodograph, d).copy_from_slice(&out);
}

/// # Safety
/// `nodes` must point to `d * n` readable `f64`s; `left` and `right`
/// must each point to `d * n` writable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn bez_subdivide_nodes(n: usize, d: usize, nodes: *const f64, left: *mut f64, right: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * n);
    let (l, r) = nodes::subdivide(n, d, nodes);
    slice::from_raw_parts_mut(left, d * n).copy_from_slice(&l);
    slice::from_raw_parts_mut(right, d * n).copy_from_slice(&r);
}

/// Single-curve Newton refinement of a point-locator parameter guess.
///
/// # Safety
/// `nodes` must point to `d * n` readable `f64`s; `point` must point to
/// `d` readable `f64`s; `updated_s` must point to one writable `f64`.
#[no_mangle]
pub unsafe extern "C" fn bez_newton_refine(n: usize, d: usize, nodes: *const f64, point: *const f64, s: f64, updated_s: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * n);
    let point = slice::from_raw_parts(point, d);
    *updated_s = newton::refine_locate(n - 1, d, nodes, point, s);
}

/// Locate the parameter of `point` on the curve; returns `-1.0` if
/// provably off the curve, `-2.0` if the point lies on multiple arcs,
/// else the refined parameter.
///
/// # Safety
/// `nodes` must point to `d * n` readable `f64`s; `point` must point to
/// `d` readable `f64`s; `s_approx` must point to one writable `f64`.
#[no_mangle]
pub unsafe extern "C" fn bez_locate_point(n: usize, d: usize, nodes: *const f64, point: *const f64, s_approx: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * n);
    let point = slice::from_raw_parts(point, d);
    *s_approx = match locate::locate_point(n - 1, d, nodes, point) {
        LocateOutcome::NotOnCurve => -1.0,
        LocateOutcome::MultipleArcs => -2.0,
        LocateOutcome::Found(s) => s,
    };
}

/// # Safety
/// `nodes` must point to `d * n` readable `f64`s; `elevated` must point
/// to `d * (n + 1)` writable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn bez_elevate_nodes(n: usize, d: usize, nodes: *const f64, elevated: *mut f64) {
    let nodes = slice::from_raw_parts(nodes, d * n);
    let out = nodes::elevate(n, d, nodes);
    slice::from_raw_parts_mut(elevated, d * (n + 1)).copy_from_slice(&out);
}

/// Classify the overlap of two planar control-polygon bounding boxes:
/// `0` = intersection, `1` = tangent, `2` = disjoint.
///
/// # Safety
/// `nodes1` must point to `2 * n1` readable `f64`s; `nodes2` must point
/// to `2 * n2` readable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn bez_bbox_intersect(n1: usize, nodes1: *const f64, n2: usize, nodes2: *const f64) -> i32 {
    let nodes1 = slice::from_raw_parts(nodes1, 2 * n1);
    let nodes2 = slice::from_raw_parts(nodes2, 2 * n2);
    let a = BBox::of_control_polygon(nodes1);
    let b = BBox::of_control_polygon(nodes2);
    bbox::classify(&a, &b) as i32
}

/// Find every parameter pair `(s, t)` with `B1(s) ~= B2(t)`.
///
/// Writes at most `s_capacity` pairs to `intersections` (interleaved
/// `[s0, t0, s1, t1, ...]`). On success, `*num_intersections` is the
/// number of pairs written and the return value is `0`. If
/// `s_capacity` is too small, `*num_intersections` is set to the
/// required capacity, `intersections` is left unwritten, and the
/// return value is `-1` ([`Status::InsufficientSpace`]'s code).
/// Any other non-zero return value is the [`Status::code`] of the
/// failure, and no outputs are written.
///
/// # Safety
/// `nodes1` must point to `2 * n1` readable `f64`s; `nodes2` must point
/// to `2 * n2` readable `f64`s; `intersections` must point to
/// `2 * s_capacity` writable `f64`s; `num_intersections` and
/// `coincident` must each point to one writable `i32`.
#[no_mangle]
pub unsafe extern "C" fn bez_curve_intersections(n1: usize, nodes1: *const f64, n2: usize, nodes2: *const f64, s_capacity: usize, intersections: *mut f64, num_intersections: *mut i32, coincident: *mut i32) -> i32 {
    let nodes1 = slice::from_raw_parts(nodes1, 2 * n1);
    let nodes2 = slice::from_raw_parts(nodes2, 2 * n2);

    let result = {
        let mut engine = intersector().lock().unwrap();
        engine.curve_intersections(n1 - 1, nodes1, n2 - 1, nodes2)
    };

    match result {
        Ok(out) => {
            if out.pairs.len() > s_capacity {
                let required = Status::InsufficientSpace { required: out.pairs.len() };
                *num_intersections = out.pairs.len() as i32;
                return required.code();
            }
            let dest = slice::from_raw_parts_mut(intersections, 2 * s_capacity);
            for (i, (s, t)) in out.pairs.iter().enumerate() {
                dest[2 * i] = *s;
                dest[2 * i + 1] = *t;
            }
            *num_intersections = out.pairs.len() as i32;
            *coincident = out.coincident as i32;
            SUCCESS
        }
        Err(status) => status.code(),
    }
}

/// Curve-pair Newton refinement: one step towards `F(s, t) = 0`.
///
/// # Safety
/// `nodes1` must point to `2 * n1` readable `f64`s; `nodes2` must point
/// to `2 * n2` readable `f64`s; `new_s` and `new_t` must each point to
/// one writable `f64`.
#[no_mangle]
pub unsafe extern "C" fn bez_newton_refine_curve_intersect(s: f64, n1: usize, nodes1: *const f64, t: f64, n2: usize, nodes2: *const f64, new_s: *mut f64, new_t: *mut f64) -> i32 {
    let nodes1 = slice::from_raw_parts(nodes1, 2 * n1);
    let nodes2 = slice::from_raw_parts(nodes2, 2 * n2);
    match newton::refine_pair(s, n1 - 1, nodes1, t, n2 - 1, nodes2) {
        Ok((s, t)) => {
            *new_s = s;
            *new_t = t;
            SUCCESS
        }
        Err(status) => status.code(),
    }
}

/// Release the process-wide intersector candidate workspace.
#[no_mangle]
pub extern "C" fn bez_free_curve_intersections_workspace() {
    intersector().lock().unwrap().clear();
}
