use ticktree_core::{Blackboard, TickContext, WorldMut};
use ticktree_tools::Tracer;

use crate::status::Status;

/// A single tree node.
///
/// `tick` may be called again after returning [`Status::Running`]; nodes keep
/// whatever resume state they need (an index, a counter, a timestamp) and
/// discard it via `reset`.
pub trait Node<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
        trace: &mut Tracer,
    ) -> Status;

    /// Clears this node's resume state, then recurses into every attached
    /// child, so the subtree behaves like a freshly built one.
    ///
    /// Stateless leaves keep the default no-op.
    fn reset(&mut self) {}

    /// Diagnostic name used in trace events and logs.
    fn name(&self) -> &str;
}
