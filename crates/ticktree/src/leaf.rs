use std::borrow::Cow;
use std::marker::PhantomData;

use ticktree_core::{AgentId, Blackboard, TickContext, WorldMut};
use ticktree_tools::{TraceEvent, Tracer};

use crate::node::Node;
use crate::status::{IntoCondition, IntoStatus, Status};

/// Leaf that runs a user callable against the world.
///
/// Errors are caught here, logged, and converted to `Failure`, so one
/// misbehaving callable cannot abort the tick for sibling branches.
pub struct Action<F, R> {
    name: Cow<'static, str>,
    run: F,
    _result: PhantomData<fn() -> R>,
}

impl<F, R> Action<F, R> {
    pub fn new(run: F) -> Self {
        Self {
            name: Cow::Borrowed("Action"),
            run,
            _result: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F, R, W> Node<W> for Action<F, R>
where
    F: FnMut(&TickContext, W::Agent, &mut W, &mut Blackboard) -> R + 'static,
    R: IntoStatus + 'static,
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
        match (self.run)(ctx, agent, world, blackboard).into_status() {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(node = %self.name, error = %err, "action callable failed");
                trace.emit(
                    TraceEvent::new(ctx.tick, "bt.action.error")
                        .with_node(self.name.clone())
                        .with_a(agent.stable_id()),
                );
                Status::Failure
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Leaf that evaluates a read-only predicate: true is `Success`, false is
/// `Failure`, an error is caught and reported as `Failure`.
pub struct ConditionCheck<F, R> {
    name: Cow<'static, str>,
    check: F,
    _result: PhantomData<fn() -> R>,
}

impl<F, R> ConditionCheck<F, R> {
    pub fn new(check: F) -> Self {
        Self {
            name: Cow::Borrowed("ConditionCheck"),
            check,
            _result: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F, R, W> Node<W> for ConditionCheck<F, R>
where
    F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> R + 'static,
    R: IntoCondition + 'static,
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
        match (self.check)(ctx, agent, &*world, &*blackboard).into_condition() {
            Ok(true) => Status::Success,
            Ok(false) => Status::Failure,
            Err(err) => {
                tracing::warn!(node = %self.name, error = %err, "condition check failed");
                trace.emit(
                    TraceEvent::new(ctx.tick, "bt.check.error")
                        .with_node(self.name.clone())
                        .with_a(agent.stable_id()),
                );
                Status::Failure
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Leaf that runs for `duration_ms` of clock time.
///
/// The first tick records a start stamp and reports `Running`, even for a
/// zero duration. Completion clears the stamp, so the same node can time a
/// later run.
pub struct Wait {
    duration_ms: u64,
    started_ms: Option<u64>,
}

impl Wait {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started_ms: None,
        }
    }
}

impl<W> Node<W> for Wait
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
        _trace: &mut Tracer,
    ) -> Status {
        match self.started_ms {
            None => {
                self.started_ms = Some(ctx.now_ms);
                Status::Running
            }
            Some(started) => {
                if ctx.now_ms.saturating_sub(started) >= self.duration_ms {
                    self.started_ms = None;
                    Status::Success
                } else {
                    Status::Running
                }
            }
        }
    }

    fn reset(&mut self) {
        self.started_ms = None;
    }

    fn name(&self) -> &str {
        "Wait"
    }
}
