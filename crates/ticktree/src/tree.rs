use ticktree_core::{Blackboard, Clock, SystemClock, TickContext, WorldMut};
use ticktree_tools::{TraceSink, Tracer};

use crate::node::Node;
use crate::status::Status;

/// Drives one agent's tree: owns the root, the blackboard, and the clock.
///
/// An external loop decides when `update` runs; the driver numbers the
/// ticks, samples the clock once, and threads the context down.
pub struct BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    root: Option<Box<dyn Node<W>>>,
    blackboard: Blackboard,
    clock: Box<dyn Clock>,
    tracer: Tracer,
    ticks: u64,
    last: Option<Status>,
}

impl<W> BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: Box<dyn Node<W>>) -> Self {
        Self {
            root: Some(root),
            blackboard: Blackboard::new(),
            clock: Box::new(SystemClock::new()),
            tracer: Tracer::new(),
            ticks: 0,
            last: None,
        }
    }

    /// Driver with no root; `update` reports `Failure` without running
    /// anything.
    pub fn empty() -> Self {
        Self {
            root: None,
            blackboard: Blackboard::new(),
            clock: Box::new(SystemClock::new()),
            tracer: Tracer::new(),
            ticks: 0,
            last: None,
        }
    }

    pub fn with_blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.tracer.set_sink(Box::new(sink));
        self
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Status of the most recent `update`, or `None` before the first one
    /// (and again after `reset`).
    pub fn last_status(&self) -> Option<Status> {
        self.last
    }

    /// Runs one tick of the tree against `world` and records the result.
    pub fn update(&mut self, agent: W::Agent, world: &mut W, dt_seconds: f32) -> Status {
        let Some(root) = self.root.as_mut() else {
            return Status::Failure;
        };

        let ctx = TickContext {
            tick: self.ticks,
            dt_seconds,
            now_ms: self.clock.now_ms(),
        };
        self.ticks = self.ticks.wrapping_add(1);

        let status = root.tick(&ctx, agent, world, &mut self.blackboard, &mut self.tracer);
        self.last = Some(status);
        status
    }

    /// Discards all in-progress resume state, the status record, and the
    /// tick counter. Blackboard contents are left alone.
    pub fn reset(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.reset();
        }
        self.last = None;
        self.ticks = 0;
    }
}
