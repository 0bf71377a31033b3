#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A small, allocation-friendly trace event.
///
/// This is intentionally "dumb data" so it can be recorded during simulation
/// and later rendered by tooling. `node` carries the emitting node's
/// diagnostic name; `a` carries one event-specific value (usually the agent's
/// stable ID).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub node: Cow<'static, str>,
    pub a: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            node: Cow::Borrowed(""),
            a: 0,
        }
    }

    pub fn with_node(mut self, node: impl Into<Cow<'static, str>>) -> Self {
        self.node = node.into();
        self
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = a;
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards events from a running tree to an optional sink.
///
/// The tree driver owns one of these and threads it down every tick, so nodes
/// stay oblivious to where events go. With no sink installed, `emit` is a
/// no-op; hot paths can skip event construction by checking `enabled` first.
#[derive(Default)]
pub struct Tracer {
    sink: Option<Box<dyn TraceSink>>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    pub fn enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn emit(&mut self, event: TraceEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(event);
        }
    }
}
