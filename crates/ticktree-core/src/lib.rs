//! Engine-agnostic primitives shared by the behavior-tree runtime and its tooling.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod clock;
pub mod tick;
pub mod world;

pub use blackboard::Blackboard;
pub use clock::{Clock, SystemClock};
pub use tick::TickContext;
pub use world::{AgentId, WorldMut, WorldView};
