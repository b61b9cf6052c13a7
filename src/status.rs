//! Shared error/status taxonomy for the curve engines.
//!
//! Internal Rust code always returns `Result<_, Status>`; the C ABI in
//! [`crate::ffi`] is the only place these collapse to raw integers.

use thiserror::Error;

/// Outcomes other than plain success for the pairwise intersector and
/// Newton refinement steps.
///
/// `Status` deliberately mirrors the flat status taxonomy of the public
/// C-callable surface (see the crate's `ffi` module): every variant here
/// has a stable integer encoding via [`Status::code`], including the
/// overloaded "candidate count" signal described in the design notes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The caller's output buffer was smaller than the number of
    /// intersections found. `required` is the buffer length the caller
    /// needs to retry with.
    #[error("output buffer too small, need space for {required} pairs")]
    InsufficientSpace { required: usize },

    /// Subdivision did not reduce every candidate to near-linear within
    /// the round budget (`MAX_SUBDIVISIONS`).
    #[error("candidates failed to converge within the subdivision budget")]
    NoConverge,

    /// The 2x2 Jacobian in curve-pair Newton refinement was singular
    /// (determinant below the machine-precision-scaled threshold).
    #[error("Newton refinement Jacobian is singular")]
    Singular,

    /// Newton iteration on a candidate converged to neither a simple
    /// root (quadratic convergence) nor a double root (linear, rate
    /// ~= 1/2) within the iteration budget.
    #[error("Newton refinement could not classify root multiplicity")]
    BadMultiplicity,

    /// `n` >= 64 candidate pairs survived the final subdivision round
    /// with overlapping convex hulls: a symptom of near-coincidence or
    /// non-simple intersections. The count itself is the status code.
    #[error("candidate blow-up: {0} surviving candidates")]
    TooManyCandidates(usize),
}

impl Status {
    /// The stable integer this status maps to on the C ABI boundary.
    ///
    /// `TooManyCandidates(n)` encodes as `n` itself (n >= 64), which is
    /// how the C surface folds a count into the status channel instead
    /// of using a dedicated out-parameter (see design notes, Open
    /// Question).
    pub fn code(self) -> i32 {
        match self {
            Status::InsufficientSpace { .. } => -1,
            Status::NoConverge => -2,
            Status::Singular => -3,
            Status::BadMultiplicity => -4,
            Status::TooManyCandidates(n) => n as i32,
        }
    }
}

/// The integer code for a successful call (no intersections were
/// rejected for capacity, convergence, or multiplicity reasons).
pub const SUCCESS: i32 = 0;

/// Candidate blow-up threshold: round 20 (or earlier) survivors at or
/// above this count fold their own count into the status channel.
pub const CANDIDATE_BLOWUP: usize = 64;

pub type BezResult<T> = Result<T, Status>;
