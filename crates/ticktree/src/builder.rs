use std::borrow::Cow;

use thiserror::Error;
use ticktree_core::{Blackboard, TickContext, WorldMut};

use crate::composite::{Parallel, Selector, Sequence};
use crate::decorator::{Condition, Cooldown, Inverter, Repeater, Succeeder};
use crate::leaf::{Action, ConditionCheck, Wait};
use crate::node::Node;
use crate::status::{IntoCondition, IntoStatus};
use crate::tree::BehaviorTree;

/// Construction misuse remembered by [`TreeBuilder`] and surfaced by
/// [`TreeBuilder::build`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    #[error("decorator `{kind}` accepts exactly one child")]
    DecoratorArity { kind: &'static str },
    #[error("end() called with no open container")]
    UnbalancedEnd,
    #[error("tree already has a root")]
    MultipleRoots,
}

/// A container node still accepting children.
enum OpenNode<W>
where
    W: WorldMut + 'static,
{
    Selector(Selector<W>),
    Sequence(Sequence<W>),
    Parallel(Parallel<W>),
    Inverter(Inverter<W>),
    Succeeder(Succeeder<W>),
    Repeater(Repeater<W>),
    Condition(Condition<W>),
    Cooldown(Cooldown<W>),
}

impl<W> OpenNode<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        match self {
            OpenNode::Selector(_) => "Selector",
            OpenNode::Sequence(_) => "Sequence",
            OpenNode::Parallel(_) => "Parallel",
            OpenNode::Inverter(_) => "Inverter",
            OpenNode::Succeeder(_) => "Succeeder",
            OpenNode::Repeater(_) => "Repeater",
            OpenNode::Condition(_) => "Condition",
            OpenNode::Cooldown(_) => "Cooldown",
        }
    }

    fn accepts_many(&self) -> bool {
        matches!(
            self,
            OpenNode::Selector(_) | OpenNode::Sequence(_) | OpenNode::Parallel(_)
        )
    }

    fn attach(&mut self, child: Box<dyn Node<W>>) {
        match self {
            OpenNode::Selector(node) => node.add_child(child),
            OpenNode::Sequence(node) => node.add_child(child),
            OpenNode::Parallel(node) => node.add_child(child),
            OpenNode::Inverter(node) => {
                node.set_child(child);
            }
            OpenNode::Succeeder(node) => {
                node.set_child(child);
            }
            OpenNode::Repeater(node) => {
                node.set_child(child);
            }
            OpenNode::Condition(node) => {
                node.set_child(child);
            }
            OpenNode::Cooldown(node) => {
                node.set_child(child);
            }
        }
    }

    fn into_node(self) -> Box<dyn Node<W>> {
        match self {
            OpenNode::Selector(node) => Box::new(node),
            OpenNode::Sequence(node) => Box::new(node),
            OpenNode::Parallel(node) => Box::new(node),
            OpenNode::Inverter(node) => Box::new(node),
            OpenNode::Succeeder(node) => Box::new(node),
            OpenNode::Repeater(node) => Box::new(node),
            OpenNode::Condition(node) => Box::new(node),
            OpenNode::Cooldown(node) => Box::new(node),
        }
    }
}

struct Frame<W>
where
    W: WorldMut + 'static,
{
    node: OpenNode<W>,
    attached: usize,
}

/// Stack-based fluent constructor.
///
/// Container calls (`selector`, `sequence`, `parallel`, and the decorators)
/// open a node; subsequent calls attach to the innermost open one; `end`
/// closes it and attaches it to its enclosing container. Leaf calls attach
/// without opening. Misuse is remembered rather than panicking mid-chain and
/// surfaces as a [`BuildError`] from `build`, which also closes any
/// still-open containers.
pub struct TreeBuilder<W>
where
    W: WorldMut + 'static,
{
    stack: Vec<Frame<W>>,
    root: Option<Box<dyn Node<W>>>,
    blackboard: Option<Blackboard>,
    error: Option<BuildError>,
}

impl<W> TreeBuilder<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            blackboard: None,
            error: None,
        }
    }

    pub fn with_blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = Some(blackboard);
        self
    }

    pub fn selector(self) -> Self {
        self.open(OpenNode::Selector(Selector::new(Vec::new())))
    }

    pub fn sequence(self) -> Self {
        self.open(OpenNode::Sequence(Sequence::new(Vec::new())))
    }

    pub fn parallel(self, success_threshold: i32, failure_threshold: i32) -> Self {
        self.open(OpenNode::Parallel(Parallel::new(
            success_threshold,
            failure_threshold,
            Vec::new(),
        )))
    }

    pub fn inverter(self) -> Self {
        self.open(OpenNode::Inverter(Inverter::new()))
    }

    pub fn succeeder(self) -> Self {
        self.open(OpenNode::Succeeder(Succeeder::new()))
    }

    pub fn repeater(self, count: i32) -> Self {
        self.open(OpenNode::Repeater(Repeater::new(count)))
    }

    pub fn condition<F, R>(self, name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> R + 'static,
        R: IntoCondition + 'static,
    {
        self.open(OpenNode::Condition(
            Condition::new(predicate).with_name(name),
        ))
    }

    pub fn cooldown(self, duration_ms: u64) -> Self {
        self.open(OpenNode::Cooldown(Cooldown::new(duration_ms)))
    }

    pub fn action<F, R>(mut self, name: impl Into<Cow<'static, str>>, run: F) -> Self
    where
        F: FnMut(&TickContext, W::Agent, &mut W, &mut Blackboard) -> R + 'static,
        R: IntoStatus + 'static,
    {
        self.attach(Box::new(Action::new(run).with_name(name)));
        self
    }

    pub fn check<F, R>(mut self, name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> R + 'static,
        R: IntoCondition + 'static,
    {
        self.attach(Box::new(ConditionCheck::new(check).with_name(name)));
        self
    }

    pub fn wait(mut self, duration_ms: u64) -> Self {
        self.attach(Box::new(Wait::new(duration_ms)));
        self
    }

    /// Closes the innermost open container.
    pub fn end(mut self) -> Self {
        match self.stack.pop() {
            Some(frame) => {
                let node = frame.node.into_node();
                self.attach(node);
            }
            None => self.fail(BuildError::UnbalancedEnd),
        }
        self
    }

    /// Closes any still-open containers and hands the finished tree to a
    /// driver, or reports the first misuse recorded along the chain.
    ///
    /// An empty builder yields a rootless driver whose `update` reports
    /// `Failure`.
    pub fn build(mut self) -> Result<BehaviorTree<W>, BuildError> {
        while let Some(frame) = self.stack.pop() {
            let node = frame.node.into_node();
            self.attach(node);
        }

        if let Some(error) = self.error {
            return Err(error);
        }

        let mut tree = match self.root {
            Some(root) => BehaviorTree::new(root),
            None => BehaviorTree::empty(),
        };
        if let Some(blackboard) = self.blackboard {
            tree = tree.with_blackboard(blackboard);
        }
        Ok(tree)
    }

    fn open(mut self, node: OpenNode<W>) -> Self {
        self.stack.push(Frame { node, attached: 0 });
        self
    }

    /// Attach a finished node to the innermost open container, or make it
    /// the root when none is open.
    fn attach(&mut self, node: Box<dyn Node<W>>) {
        let error = match self.stack.last_mut() {
            Some(frame) => {
                if !frame.node.accepts_many() && frame.attached >= 1 {
                    Some(BuildError::DecoratorArity {
                        kind: frame.node.kind(),
                    })
                } else {
                    frame.node.attach(node);
                    frame.attached += 1;
                    None
                }
            }
            None => {
                if self.root.is_some() {
                    Some(BuildError::MultipleRoots)
                } else {
                    self.root = Some(node);
                    None
                }
            }
        };

        if let Some(error) = error {
            self.fail(error);
        }
    }

    // First recorded misuse wins.
    fn fail(&mut self, error: BuildError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl<W> Default for TreeBuilder<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
