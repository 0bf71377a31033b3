//! Trace and test tooling for the behavior-tree runtime.
//!
//! This crate is intentionally lightweight and engine-agnostic. Editor
//! integrations, debug overlays, and the like should live in dedicated
//! adapter crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod clock;
pub mod trace;

pub use clock::ManualClock;
pub use trace::{NullTraceSink, TraceEvent, TraceSink, Tracer, VecTraceSink};
