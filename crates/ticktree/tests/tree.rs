use std::cell::RefCell;
use std::rc::Rc;

use ticktree::{Action, BehaviorTree, Status, Wait};
use ticktree_core::{Blackboard, TickContext, WorldMut, WorldView};
use ticktree_tools::{ManualClock, TraceEvent, TraceSink};

#[derive(Debug, Default)]
struct World {
    progress: u32,
    ticks_seen: Vec<u64>,
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

/// Two updates to finish, re-arming through world state so a rerun against a
/// fresh world repeats the same shape.
fn advance(_ctx: &TickContext, _agent: u64, world: &mut World, _bb: &mut Blackboard) -> Status {
    world.progress += 1;
    if world.progress >= 2 {
        world.progress = 0;
        Status::Success
    } else {
        Status::Running
    }
}

fn record_tick(ctx: &TickContext, _agent: u64, world: &mut World, _bb: &mut Blackboard) -> Status {
    world.ticks_seen.push(ctx.tick);
    Status::Success
}

fn make_tree() -> BehaviorTree<World> {
    BehaviorTree::new(Box::new(Action::new(advance).with_name("advance")))
}

#[test]
fn rootless_tree_fails_without_recording_a_status() {
    let mut world = World::default();
    let mut tree: BehaviorTree<World> = BehaviorTree::empty();

    assert_eq!(tree.update(1, &mut world, 0.1), Status::Failure);
    assert_eq!(tree.last_status(), None);
}

#[test]
fn update_records_the_latest_status() {
    let mut world = World::default();
    let mut tree = make_tree();

    assert_eq!(tree.last_status(), None);
    tree.update(1, &mut world, 0.1);
    assert_eq!(tree.last_status(), Some(Status::Running));
    tree.update(1, &mut world, 0.1);
    assert_eq!(tree.last_status(), Some(Status::Success));
}

#[test]
fn reset_then_rerun_matches_a_fresh_tree() {
    let mut fresh_world = World::default();
    let mut fresh = make_tree();
    let fresh_run = [
        fresh.update(1, &mut fresh_world, 0.1),
        fresh.update(1, &mut fresh_world, 0.1),
    ];
    assert_eq!(fresh_run, [Status::Running, Status::Success]);

    let mut world = World::default();
    let mut reused = make_tree();
    reused.update(1, &mut world, 0.1);
    reused.update(1, &mut world, 0.1);
    reused.blackboard_mut().set("persistent", 1u32);

    reused.reset();
    assert_eq!(reused.last_status(), None);
    // Reset touches tree state only; the blackboard keeps its entries.
    assert!(reused.blackboard().contains("persistent"));

    let mut rerun_world = World::default();
    let rerun = [
        reused.update(1, &mut rerun_world, 0.1),
        reused.update(1, &mut rerun_world, 0.1),
    ];
    assert_eq!(rerun, fresh_run);
}

#[test]
fn context_tick_counts_updates_and_restarts_after_reset() {
    let mut world = World::default();
    let mut tree = BehaviorTree::new(Box::new(Action::new(record_tick)));

    for _ in 0..3 {
        tree.update(1, &mut world, 0.1);
    }
    tree.reset();
    tree.update(1, &mut world, 0.1);

    assert_eq!(world.ticks_seen, vec![0, 1, 2, 0]);
}

#[test]
fn update_reads_time_from_the_injected_clock() {
    let clock = ManualClock::new();
    let mut world = World::default();
    let mut tree = BehaviorTree::new(Box::new(Wait::new(50))).with_clock(clock.clone());

    assert_eq!(tree.update(1, &mut world, 0.1), Status::Running);
    clock.set(25);
    assert_eq!(tree.update(1, &mut world, 0.1), Status::Running);
    clock.set(50);
    assert_eq!(tree.update(1, &mut world, 0.1), Status::Success);
}

fn explode(
    _ctx: &TickContext,
    _agent: u64,
    _world: &mut World,
    _bb: &mut Blackboard,
) -> Result<Status, String> {
    Err("boom".to_string())
}

#[test]
fn trace_events_reach_the_installed_sink() {
    let sink = RcSink::default();
    let events = sink.0.clone();

    let mut world = World::default();
    let mut tree =
        BehaviorTree::new(Box::new(Action::new(explode).with_name("explode"))).with_trace_sink(sink);

    assert_eq!(tree.update(7, &mut world, 0.1), Status::Failure);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, "bt.action.error");
    assert_eq!(events[0].node, "explode");
    assert_eq!(events[0].tick, 0);
    assert_eq!(events[0].a, 7);
}

#[test]
fn saved_blackboard_revives_a_new_tree() {
    let mut world = World::default();
    let mut tree = make_tree();
    tree.blackboard_mut().set("patrol_index", 2u64);
    tree.update(1, &mut world, 0.1);

    let saved = serde_json::to_string(tree.blackboard()).expect("serialize");
    let restored: Blackboard = serde_json::from_str(&saved).expect("deserialize");

    let mut revived = make_tree().with_blackboard(restored);
    assert_eq!(
        revived
            .blackboard()
            .get("patrol_index")
            .and_then(|v| v.as_u64()),
        Some(2)
    );

    let mut fresh_world = World::default();
    assert_eq!(revived.update(1, &mut fresh_world, 0.1), Status::Running);
}

fn read_target(_ctx: &TickContext, _agent: u64, _world: &mut World, bb: &mut Blackboard) -> bool {
    bb.contains("target")
}

#[test]
fn blackboard_is_shared_between_caller_and_actions() {
    let mut preset = Blackboard::new();
    preset.set("target", "tower");

    let mut world = World::default();
    let mut tree = BehaviorTree::new(Box::new(Action::new(read_target).with_name("read_target")))
        .with_blackboard(preset);

    assert_eq!(tree.update(1, &mut world, 0.1), Status::Success);
    assert_eq!(
        tree.blackboard().get("target").and_then(|v| v.as_str()),
        Some("tower")
    );

    tree.blackboard_mut().remove("target");
    assert_eq!(tree.update(1, &mut world, 0.1), Status::Failure);
}
