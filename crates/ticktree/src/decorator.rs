use std::borrow::Cow;

use ticktree_core::{AgentId, Blackboard, TickContext, WorldMut};
use ticktree_tools::{TraceEvent, Tracer};

use crate::node::Node;
use crate::status::{ActionError, IntoCondition, Status};

/// Swaps `Success` and `Failure`; `Running` passes through.
/// With no child attached, fails.
pub struct Inverter<W>
where
    W: WorldMut + 'static,
{
    child: Option<Box<dyn Node<W>>>,
}

impl<W> Inverter<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self { child: None }
    }

    /// Installs `child`, returning any previously attached one.
    pub fn set_child(&mut self, child: Box<dyn Node<W>>) -> Option<Box<dyn Node<W>>> {
        self.child.replace(child)
    }

    pub fn with_child(mut self, child: Box<dyn Node<W>>) -> Self {
        self.child = Some(child);
        self
    }
}

impl<W> Default for Inverter<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Node<W> for Inverter<W>
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
    ) -> Status {
        let Some(child) = self.child.as_mut() else {
            return Status::Failure;
        };
        match child.tick(ctx, agent, world, blackboard, trace) {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }

    fn reset(&mut self) {
        if let Some(child) = self.child.as_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        "Inverter"
    }
}

/// Maps `Failure` to `Success`; `Success` and `Running` pass through.
/// With no child attached, succeeds.
pub struct Succeeder<W>
where
    W: WorldMut + 'static,
{
    child: Option<Box<dyn Node<W>>>,
}

impl<W> Succeeder<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self { child: None }
    }

    pub fn set_child(&mut self, child: Box<dyn Node<W>>) -> Option<Box<dyn Node<W>>> {
        self.child.replace(child)
    }

    pub fn with_child(mut self, child: Box<dyn Node<W>>) -> Self {
        self.child = Some(child);
        self
    }
}

impl<W> Default for Succeeder<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Node<W> for Succeeder<W>
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
    ) -> Status {
        let Some(child) = self.child.as_mut() else {
            return Status::Success;
        };
        match child.tick(ctx, agent, world, blackboard, trace) {
            Status::Failure => Status::Success,
            status => status,
        }
    }

    fn reset(&mut self) {
        if let Some(child) = self.child.as_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        "Succeeder"
    }
}

/// Re-invokes its child until `count` successes accumulate, then succeeds.
///
/// Child `Running` and `Failure` pass through as the repeater's own result
/// and leave the counter alone. A negative `count` repeats forever and the
/// repeater always reports `Running`. `reset` zeroes the counter.
pub struct Repeater<W>
where
    W: WorldMut + 'static,
{
    child: Option<Box<dyn Node<W>>>,
    count: i32,
    completed: u32,
}

impl<W> Repeater<W>
where
    W: WorldMut + 'static,
{
    pub fn new(count: i32) -> Self {
        Self {
            child: None,
            count,
            completed: 0,
        }
    }

    pub fn set_child(&mut self, child: Box<dyn Node<W>>) -> Option<Box<dyn Node<W>>> {
        self.child.replace(child)
    }

    pub fn with_child(mut self, child: Box<dyn Node<W>>) -> Self {
        self.child = Some(child);
        self
    }

    /// Child successes observed since construction or the last `reset`.
    pub fn completed(&self) -> u32 {
        self.completed
    }
}

impl<W> Node<W> for Repeater<W>
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
    ) -> Status {
        let Some(child) = self.child.as_mut() else {
            return Status::Failure;
        };

        let status = child.tick(ctx, agent, world, blackboard, trace);
        if status == Status::Success {
            self.completed = self.completed.saturating_add(1);
        }

        if self.count < 0 {
            return Status::Running;
        }

        match status {
            Status::Success => {
                if self.completed >= self.count as u32 {
                    Status::Success
                } else {
                    Status::Running
                }
            }
            status => status,
        }
    }

    fn reset(&mut self) {
        self.completed = 0;
        if let Some(child) = self.child.as_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        "Repeater"
    }
}

/// Gates its child behind a predicate.
///
/// A false (or erroring) predicate fails without touching the child; a true
/// predicate delegates, or succeeds when no child is attached.
pub struct Condition<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    predicate: Box<dyn FnMut(&TickContext, W::Agent, &W, &Blackboard) -> Result<bool, ActionError>>,
    child: Option<Box<dyn Node<W>>>,
}

impl<W> Condition<W>
where
    W: WorldMut + 'static,
{
    pub fn new<F, R>(mut predicate: F) -> Self
    where
        F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> R + 'static,
        R: IntoCondition + 'static,
    {
        Self {
            name: Cow::Borrowed("Condition"),
            predicate: Box::new(
                move |ctx: &TickContext, agent: W::Agent, world: &W, blackboard: &Blackboard| {
                    predicate(ctx, agent, world, blackboard).into_condition()
                },
            ),
            child: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_child(&mut self, child: Box<dyn Node<W>>) -> Option<Box<dyn Node<W>>> {
        self.child.replace(child)
    }

    pub fn with_child(mut self, child: Box<dyn Node<W>>) -> Self {
        self.child = Some(child);
        self
    }
}

impl<W> Node<W> for Condition<W>
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
    ) -> Status {
        let holds = match (self.predicate)(ctx, agent, &*world, &*blackboard) {
            Ok(holds) => holds,
            Err(err) => {
                tracing::warn!(node = %self.name, error = %err, "condition predicate failed");
                trace.emit(
                    TraceEvent::new(ctx.tick, "bt.condition.error")
                        .with_node(self.name.clone())
                        .with_a(agent.stable_id()),
                );
                return Status::Failure;
            }
        };

        if !holds {
            return Status::Failure;
        }

        match self.child.as_mut() {
            Some(child) => child.tick(ctx, agent, world, blackboard, trace),
            None => Status::Success,
        }
    }

    fn reset(&mut self) {
        if let Some(child) = self.child.as_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fails fast while the child's last completion is younger than
/// `duration_ms`.
///
/// The stamp is taken only when the child completes (`Success` or
/// `Failure`); a still-`Running` child does not restart the window. With no
/// child attached, fails.
pub struct Cooldown<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    duration_ms: u64,
    last_run_ms: Option<u64>,
    child: Option<Box<dyn Node<W>>>,
}

impl<W> Cooldown<W>
where
    W: WorldMut + 'static,
{
    pub fn new(duration_ms: u64) -> Self {
        Self {
            name: Cow::Borrowed("Cooldown"),
            duration_ms,
            last_run_ms: None,
            child: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_child(&mut self, child: Box<dyn Node<W>>) -> Option<Box<dyn Node<W>>> {
        self.child.replace(child)
    }

    pub fn with_child(mut self, child: Box<dyn Node<W>>) -> Self {
        self.child = Some(child);
        self
    }
}

impl<W> Node<W> for Cooldown<W>
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
    ) -> Status {
        if let Some(last) = self.last_run_ms {
            if ctx.now_ms.saturating_sub(last) < self.duration_ms {
                if trace.enabled() {
                    trace.emit(
                        TraceEvent::new(ctx.tick, "bt.cooldown.gated")
                            .with_node(self.name.clone())
                            .with_a(agent.stable_id()),
                    );
                }
                return Status::Failure;
            }
        }

        let Some(child) = self.child.as_mut() else {
            return Status::Failure;
        };

        let status = child.tick(ctx, agent, world, blackboard, trace);
        if status != Status::Running {
            self.last_run_ms = Some(ctx.now_ms);
        }
        status
    }

    fn reset(&mut self) {
        self.last_run_ms = None;
        if let Some(child) = self.child.as_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
