//! Numerical core for planar Bezier curve evaluation, point location,
//! and pairwise intersection.
//!
//! The crate is organized leaves-first: [`nodes`] holds the pure
//! algebraic primitives (de Casteljau evaluation, hodograph,
//! subdivision, elevation, specialization) that everything else is
//! built on. [`bbox`] and [`locate`] are single-curve consumers of
//! `nodes`; [`intersect`] is the main engine, driving repeated
//! subdivision, [`bbox`] classification, and [`newton`] refinement
//! across a pair of curves. [`status`] is the shared error taxonomy,
//! and [`ffi`] is the C-callable surface over flat arrays that the
//! rest of this crate never deals with directly.
//!
//! # Concurrency
//!
//! Every function here is synchronous and single-threaded: nothing
//! suspends, nothing spawns. [`intersect::Intersector`] owns a growable
//! candidate workspace that is reused, never shrunk, across calls to
//! amortize allocation — this is ordinary owned Rust state, not a
//! process-wide global, so normal borrowing rules already rule out data
//! races on it. A multithreaded consumer should give each thread its
//! own `Intersector`, or wrap a shared one in a `Mutex`; the `ffi`
//! module does the latter for its process-wide instance, since the
//! C ABI has no handle to thread an engine value through.

pub mod bbox;
pub mod ffi;
pub mod intersect;
pub mod locate;
pub mod newton;
pub mod nodes;
pub mod status;
pub mod workspace;

pub use bbox::{BBox, Overlap};
pub use intersect::{IntersectionOutput, Intersector};
pub use locate::{locate_point, LocateOutcome};
pub use status::{BezResult, Status};
