//! Resumable behavior-tree runtime built on `ticktree-core`.
//!
//! Control flow nodes here are the memory variants: a branch that returned
//! `Running` resumes at exactly that child on the next tick, without
//! re-invoking siblings that already completed. Preemption is expressed as
//! tree structure (`Condition`, `Cooldown`) or by calling
//! [`BehaviorTree::reset`], never by an engine-side policy.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod node;
pub mod status;
pub mod tree;

pub use builder::{BuildError, TreeBuilder};
pub use composite::{Parallel, Selector, Sequence};
pub use decorator::{Condition, Cooldown, Inverter, Repeater, Succeeder};
pub use leaf::{Action, ConditionCheck, Wait};
pub use node::Node;
pub use status::{ActionError, IntoCondition, IntoStatus, Status};
pub use tree::BehaviorTree;
