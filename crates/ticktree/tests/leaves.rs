use std::cell::RefCell;
use std::rc::Rc;

use ticktree::{Action, ConditionCheck, Node, Status, Wait};
use ticktree_core::{Blackboard, TickContext, WorldMut, WorldView};
use ticktree_tools::{TraceEvent, TraceSink, Tracer};

#[derive(Debug, Default)]
struct World {
    hits: u32,
}

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

fn ctx_at(tick: u64, now_ms: u64) -> TickContext {
    TickContext {
        tick,
        dt_seconds: 0.1,
        now_ms,
    }
}

#[test]
fn action_passes_status_through() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    for status in [Status::Success, Status::Failure, Status::Running] {
        let mut action = Action::new(
            move |_ctx: &TickContext, _agent: u64, world: &mut World, _bb: &mut Blackboard| {
                world.hits += 1;
                status
            },
        );
        assert_eq!(
            action.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
            status
        );
    }
    assert_eq!(world.hits, 3);
}

#[test]
fn action_coerces_bool_results() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut hit = Action::new(
        |_ctx: &TickContext, _agent: u64, _world: &mut World, _bb: &mut Blackboard| true,
    );
    let mut miss = Action::new(
        |_ctx: &TickContext, _agent: u64, _world: &mut World, _bb: &mut Blackboard| false,
    );

    assert_eq!(
        hit.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );
    assert_eq!(
        miss.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Failure
    );
}

fn step_twice(
    _ctx: &TickContext,
    _agent: u64,
    world: &mut World,
    _bb: &mut Blackboard,
) -> Result<Status, String> {
    world.hits += 1;
    if world.hits < 2 {
        Ok(Status::Running)
    } else {
        Ok(Status::Success)
    }
}

#[test]
fn action_unwraps_ok_statuses() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut action = Action::new(step_twice);
    assert_eq!(
        action.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    assert_eq!(
        action.tick(&ctx_at(1, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );
}

#[test]
fn erroring_action_fails_and_reports() {
    let mut world = World::default();
    let mut bb = Blackboard::new();

    let sink = RcSink::default();
    let events = sink.0.clone();
    let mut tracer = Tracer::new();
    tracer.set_sink(Box::new(sink));

    let mut action = Action::new(
        |_ctx: &TickContext,
         _agent: u64,
         _world: &mut World,
         _bb: &mut Blackboard|
         -> Result<Status, String> { Err("path blocked".to_string()) },
    )
    .with_name("move_to");

    assert_eq!(
        action.tick(&ctx_at(3, 0), 9, &mut world, &mut bb, &mut tracer),
        Status::Failure
    );

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, "bt.action.error");
    assert_eq!(events[0].node, "move_to");
    assert_eq!(events[0].tick, 3);
    assert_eq!(events[0].a, 9);
}

fn healthy(_ctx: &TickContext, _agent: u64, world: &World, _bb: &Blackboard) -> bool {
    world.hits == 0
}

#[test]
fn check_maps_bool_onto_success_and_failure() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut check = ConditionCheck::new(healthy);
    assert_eq!(
        check.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );

    world.hits = 5;
    assert_eq!(
        check.tick(&ctx_at(1, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Failure
    );
}

#[test]
fn erroring_check_fails_and_reports() {
    let mut world = World::default();
    let mut bb = Blackboard::new();

    let sink = RcSink::default();
    let events = sink.0.clone();
    let mut tracer = Tracer::new();
    tracer.set_sink(Box::new(sink));

    let mut check = ConditionCheck::new(
        |_ctx: &TickContext, _agent: u64, _world: &World, _bb: &Blackboard| -> Result<bool, String> {
            Err("sensor offline".to_string())
        },
    )
    .with_name("enemy_near");

    assert_eq!(
        check.tick(&ctx_at(0, 0), 2, &mut world, &mut bb, &mut tracer),
        Status::Failure
    );

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, "bt.check.error");
    assert_eq!(events[0].node, "enemy_near");
    assert_eq!(events[0].a, 2);
}

#[test]
fn wait_runs_until_elapsed() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut wait = Wait::new(10);
    assert_eq!(
        wait.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    assert_eq!(
        wait.tick(&ctx_at(1, 5), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    assert_eq!(
        wait.tick(&ctx_at(2, 10), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );
}

#[test]
fn wait_rearms_after_success() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut wait = Wait::new(10);
    wait.tick(&ctx_at(0, 100), 1, &mut world, &mut bb, &mut tracer);
    assert_eq!(
        wait.tick(&ctx_at(1, 110), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );

    // The next invocation opens a fresh window from the current time.
    assert_eq!(
        wait.tick(&ctx_at(2, 115), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    assert_eq!(
        wait.tick(&ctx_at(3, 125), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );
}

#[test]
fn zero_duration_wait_still_runs_one_tick() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut wait = Wait::new(0);
    assert_eq!(
        wait.tick(&ctx_at(0, 42), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    assert_eq!(
        wait.tick(&ctx_at(1, 42), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );
}

#[test]
fn wait_reset_clears_the_window() {
    let mut world = World::default();
    let mut bb = Blackboard::new();
    let mut tracer = Tracer::new();

    let mut wait = Wait::new(10);
    assert_eq!(
        wait.tick(&ctx_at(0, 0), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    <Wait as Node<World>>::reset(&mut wait);

    // The stamp taken at now=0 is gone; a new window opens at now=8.
    assert_eq!(
        wait.tick(&ctx_at(1, 8), 1, &mut world, &mut bb, &mut tracer),
        Status::Running
    );
    assert_eq!(
        wait.tick(&ctx_at(2, 18), 1, &mut world, &mut bb, &mut tracer),
        Status::Success
    );
}
