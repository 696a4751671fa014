//! Tooling primitives for inspecting decision making.
//!
//! Traces are recorded per entity into its blackboard, so they follow the same ownership rules as
//! the rest of the decision state. Debug UIs and inspectors live outside this workspace.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, install_log, take_log, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink,
    TRACE_LOG, TRACE_SINK,
};
