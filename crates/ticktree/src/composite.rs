use ticktree_core::{Blackboard, TickContext, WorldMut};
use ticktree_tools::Tracer;

use crate::node::Node;
use crate::status::Status;

/// Logical OR over ordered children, short-circuiting and resumable.
///
/// A child that returns `Running` is remembered by index; the next tick
/// resumes there, so siblings that already failed this run are not
/// re-invoked. With no children the selector fails.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn Node<W>>>,
    index: usize,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn Node<W>>>) -> Self {
        Self { children, index: 0 }
    }

    pub fn add_child(&mut self, child: Box<dyn Node<W>>) {
        self.children.push(child);
    }

    /// Removes and returns the child at `index`; out of range is a no-op.
    /// A stale resume index is tolerated by the tick loop, not fixed up here.
    pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Node<W>>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }
}

impl<W> Node<W> for Selector<W>
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
        while self.index < self.children.len() {
            let status = self.children[self.index].tick(ctx, agent, world, blackboard, trace);
            match status {
                Status::Running => return Status::Running,
                Status::Success => {
                    self.index = 0;
                    return Status::Success;
                }
                Status::Failure => self.index += 1,
            }
        }

        self.index = 0;
        Status::Failure
    }

    fn reset(&mut self) {
        self.index = 0;
        for child in self.children.iter_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        "Selector"
    }
}

/// Logical AND over ordered children; the dual of [`Selector`].
///
/// First failure short-circuits; a `Running` child pauses the sequence at
/// that index. With no children the sequence succeeds.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn Node<W>>>,
    index: usize,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn Node<W>>>) -> Self {
        Self { children, index: 0 }
    }

    pub fn add_child(&mut self, child: Box<dyn Node<W>>) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Node<W>>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }
}

impl<W> Node<W> for Sequence<W>
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
        while self.index < self.children.len() {
            let status = self.children[self.index].tick(ctx, agent, world, blackboard, trace);
            match status {
                Status::Running => return Status::Running,
                Status::Failure => {
                    self.index = 0;
                    return Status::Failure;
                }
                Status::Success => self.index += 1,
            }
        }

        self.index = 0;
        Status::Success
    }

    fn reset(&mut self) {
        self.index = 0;
        for child in self.children.iter_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        "Sequence"
    }
}

/// Ticks every child every time and counts the results against two
/// thresholds. `-1` for either threshold means "all children".
///
/// The parallel itself keeps no cross-tick memory; children carry their own.
pub struct Parallel<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn Node<W>>>,
    success_threshold: i32,
    failure_threshold: i32,
}

impl<W> Parallel<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        success_threshold: i32,
        failure_threshold: i32,
        children: Vec<Box<dyn Node<W>>>,
    ) -> Self {
        Self {
            children,
            success_threshold,
            failure_threshold,
        }
    }

    pub fn add_child(&mut self, child: Box<dyn Node<W>>) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Node<W>>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }
}

impl<W> Node<W> for Parallel<W>
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
        let mut successes = 0usize;
        let mut failures = 0usize;

        for child in self.children.iter_mut() {
            match child.tick(ctx, agent, world, blackboard, trace) {
                Status::Success => successes += 1,
                Status::Failure => failures += 1,
                Status::Running => {}
            }
        }

        let n = self.children.len();
        let success_needed = if self.success_threshold < 0 {
            n
        } else {
            self.success_threshold as usize
        };
        let failure_needed = if self.failure_threshold < 0 {
            n
        } else {
            self.failure_threshold as usize
        };

        // Failure wins when both thresholds are met on the same tick.
        if failures >= failure_needed {
            Status::Failure
        } else if successes >= success_needed {
            Status::Success
        } else {
            Status::Running
        }
    }

    fn reset(&mut self) {
        for child in self.children.iter_mut() {
            child.reset();
        }
    }

    fn name(&self) -> &str {
        "Parallel"
    }
}
