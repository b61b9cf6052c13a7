//! The pairwise intersector's growable candidate workspace.
//!
//! The natural recursive subdivision blows the stack for deep
//! subdivisions, so the engine keeps two append-only buffers and swaps
//! their roles between rounds instead of recursing. Buffers are grown,
//! never shrunk, across invocations so repeated calls on similarly
//! sized curves amortize their allocations. Each buffer is a
//! [`TinyVec`] inlining the first four candidates (one subdivision's
//! worth of children) before spilling to the heap, since most rounds
//! stay within a handful of live candidates.

use tinyvec::TinyVec;

/// One surviving pair of sub-arcs during pairwise intersection: each
/// side's parameter range on its original curve, plus the control
/// polygon of that restriction.
#[derive(Clone, Debug, Default)]
pub struct IntersectCandidate {
    pub s_range: (f64, f64),
    pub t_range: (f64, f64),
    pub nodes1: Vec<f64>,
    pub nodes2: Vec<f64>,
}

/// The double-buffered candidate workspace owned by an
/// [`crate::intersect::Intersector`].
///
/// `current` holds this round's surviving candidates; `push` appends to
/// `next`. [`Workspace::advance_round`] swaps the two and clears the new
/// `next`, reusing its backing allocation rather than freeing it.
#[derive(Default)]
pub struct Workspace {
    pub(crate) current: TinyVec<[IntersectCandidate; 4]>,
    pub(crate) next: TinyVec<[IntersectCandidate; 4]>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace { current: TinyVec::new(), next: TinyVec::new() }
    }

    pub fn seed(&mut self, candidate: IntersectCandidate) {
        self.current.clear();
        self.next.clear();
        self.current.push(candidate);
    }

    pub fn current(&self) -> &[IntersectCandidate] {
        &self.current
    }

    pub fn push_next(&mut self, candidate: IntersectCandidate) {
        self.next.push(candidate);
    }

    /// Swap `next` into `current` for the following round, clearing
    /// `next` (but keeping its allocated capacity) for reuse.
    pub fn advance_round(&mut self) {
        core::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }

    /// Release both buffers' backing storage. Exposed to the C ABI as
    /// the explicit teardown entry point for long-lived engines.
    pub fn clear(&mut self) {
        self.current = TinyVec::new();
        self.next = TinyVec::new();
    }
}
