/// Immutable per-update snapshot handed to every node.
///
/// Built fresh by the tree driver on each `update`; nodes never retain it
/// across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Monotonically increasing update counter, starting at 0.
    pub tick: u64,
    /// Simulation seconds since the previous update.
    pub dt_seconds: f32,
    /// Milliseconds reported by the driving clock at the start of the update.
    pub now_ms: u64,
}
