//! Trait definitions and shared observable types for the Storyloom
//! narrative pipeline.
//!
//! Every collaborator the orchestrator touches is a trait seam defined
//! here: the two remote clients, the story repository, the offline queue,
//! the network monitor, and the error sink. Concrete implementations live
//! in `storyloom_clients`, `storyloom_storage`, and `storyloom_pipeline`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{
    ChapterGenerator, ErrorSink, MetadataExtractor, NetworkMonitor, OfflineQueue, StoryRepository,
};
pub use types::{DrainReport, GenerationOutcome, PipelineEvent, PipelineStage};
