//! The visitor contract and its per-wave context.

use ripple_arena::StateTracker;
use ripple_core::{Edge, NodeId};

/// Read-only view handed to every visitor callback during a wave.
#[derive(Clone, Copy, Debug)]
pub struct WaveContext<'a> {
    generation: u64,
    state: &'a StateTracker,
}

impl<'a> WaveContext<'a> {
    /// Construct a context.
    ///
    /// Typically called by the engines. Tests may build one directly to
    /// drive a visitor by hand.
    pub fn new(generation: u64, state: &'a StateTracker) -> Self {
        Self { generation, state }
    }

    /// 1-based index of the running wave.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The engine's persistent per-node flags.
    pub fn state(&self) -> &'a StateTracker {
        self.state
    }
}

/// Algorithm logic injected into a wave engine.
///
/// One wave expands every frontier node: for each out-edge, in store
/// order, the engine asks [`select`](Self::select) whether the edge may
/// be followed; the first approved arrival at a node that has not yet been
/// reached this wave calls [`visit`](Self::visit) and places the node in
/// the next frontier.
///
/// # Concurrency
///
/// `select` and `visit` take `&self` because the parallel engine calls
/// them from several workers at once (and requires `V: Sync`). Any state
/// they mutate must be atomic or otherwise synchronised. `start` and `end`
/// take `&mut self` and never overlap with workers.
///
/// The *set* of nodes passed to `visit` in a wave is the same for every
/// engine; the order is only deterministic for the sequential engine.
pub trait Visitor {
    /// Called once before the wave expands.
    fn start(&mut self, ctx: &WaveContext<'_>) {
        let _ = ctx;
    }

    /// Whether `edge` may be followed this wave.
    ///
    /// Called for every out-edge of every frontier node, including edges
    /// whose target was already reached earlier in the wave.
    fn select(&self, edge: &Edge, ctx: &WaveContext<'_>) -> bool;

    /// Called exactly once per node per wave, on first approved arrival.
    fn visit(&self, node: NodeId, ctx: &WaveContext<'_>);

    /// Called once after the next frontier is assembled, before it
    /// replaces the current one.
    fn end(&mut self, ctx: &WaveContext<'_>) {
        let _ = ctx;
    }
}

/// A [`Visitor`] assembled from a `select` and a `visit` closure.
///
/// ```
/// use ripple_propagator::{FnVisitor, Visitor};
///
/// let follow_even = FnVisitor::new(|e, _| e.target.0 % 2 == 0, |_, _| {});
/// # let _ = &follow_even;
/// ```
pub struct FnVisitor<S, F> {
    select: S,
    visit: F,
}

impl<S, F> FnVisitor<S, F>
where
    S: Fn(&Edge, &WaveContext<'_>) -> bool,
    F: Fn(NodeId, &WaveContext<'_>),
{
    /// Wrap the two closures.
    pub fn new(select: S, visit: F) -> Self {
        Self { select, visit }
    }
}

impl<S, F> Visitor for FnVisitor<S, F>
where
    S: Fn(&Edge, &WaveContext<'_>) -> bool,
    F: Fn(NodeId, &WaveContext<'_>),
{
    fn select(&self, edge: &Edge, ctx: &WaveContext<'_>) -> bool {
        (self.select)(edge, ctx)
    }

    fn visit(&self, node: NodeId, ctx: &WaveContext<'_>) {
        (self.visit)(node, ctx)
    }
}

impl<S, F> std::fmt::Debug for FnVisitor<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnVisitor").finish_non_exhaustive()
    }
}

impl<V: Visitor + ?Sized> Visitor for Box<V> {
    fn start(&mut self, ctx: &WaveContext<'_>) {
        (**self).start(ctx)
    }
    fn select(&self, edge: &Edge, ctx: &WaveContext<'_>) -> bool {
        (**self).select(edge, ctx)
    }
    fn visit(&self, node: NodeId, ctx: &WaveContext<'_>) {
        (**self).visit(node, ctx)
    }
    fn end(&mut self, ctx: &WaveContext<'_>) {
        (**self).end(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_arena::ScratchPool;
    use ripple_core::EdgeId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn context_accessors() {
        let state = StateTracker::new(ScratchPool::global(), 3).unwrap();
        state.add_state(1, &[NodeId(2)]);
        let ctx = WaveContext::new(4, &state);
        assert_eq!(ctx.generation(), 4);
        assert!(ctx.state().is_in_state(1, NodeId(2)));
    }

    #[test]
    fn fn_visitor_forwards_to_closures() {
        let hits = AtomicUsize::new(0);
        let mut v = FnVisitor::new(
            |e, ctx| e.target.0 as u64 >= ctx.generation(),
            |_, _| {
                hits.fetch_add(1, Ordering::Relaxed);
            },
        );
        let state = StateTracker::new(ScratchPool::global(), 4).unwrap();
        let ctx = WaveContext::new(2, &state);
        let near = Edge::new(EdgeId(0), NodeId(0), NodeId(1));
        let far = Edge::new(EdgeId(1), NodeId(0), NodeId(3));

        v.start(&ctx);
        assert!(!v.select(&near, &ctx));
        assert!(v.select(&far, &ctx));
        v.visit(NodeId(3), &ctx);
        v.end(&ctx);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn boxed_visitor_is_a_visitor() {
        let v: Box<dyn Visitor> = Box::new(FnVisitor::new(|_, _| true, |_, _| {}));
        let state = StateTracker::new(ScratchPool::global(), 1).unwrap();
        let ctx = WaveContext::new(1, &state);
        assert!(v.select(&Edge::new(EdgeId(0), NodeId(0), NodeId(0)), &ctx));
    }
}
