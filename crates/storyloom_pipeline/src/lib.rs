//! The Storyloom pipeline orchestrator.
//!
//! Sequences entry → extract metadata → generate chapter → persist
//! chapter+node, publishing an observable event at each transition, and
//! branches to the durable offline queue when connectivity is missing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod monitor;
mod orchestrator;
mod sink;

pub use monitor::WatchConnectivityMonitor;
pub use orchestrator::{REPLAY_SURFACE_THRESHOLD, StoryPipeline, StoryPipelineBuilder};
pub use sink::TracingErrorSink;
