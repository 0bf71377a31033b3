use core::fmt::Debug;

/// Stable identifier for an agent.
///
/// The engine never inspects agents beyond this; `stable_id` feeds trace
/// events and logs.
pub trait AgentId: Copy + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only world access.
///
/// The core crate intentionally does not prescribe which queries a world must
/// expose; games should define extension traits. Only caller-supplied
/// callables ever look inside.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
