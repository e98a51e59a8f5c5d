//! Storyloom: a causally linked story graph grown from journal entries,
//! with an offline-resilient generation pipeline.
//!
//! Each journal entry flows through metadata extraction and chapter
//! generation (both remote calls), then lands in the local story graph as
//! a chapter plus a story node linked to its predecessor. When the device
//! is offline the request is captured in a durable queue and replayed on
//! reconnect, so a submission is never lost.
//!
//! # Architecture
//!
//! The orchestrator depends only on trait seams:
//! - [`MetadataExtractor`] and [`ChapterGenerator`] - the two remote calls
//! - [`StoryRepository`] - the persisted story graph
//! - [`OfflineQueue`] - durable capture of deferred requests
//! - [`NetworkMonitor`] - connectivity state and the reconnect edge
//! - [`ErrorSink`] - terminal-failure reporting
//!
//! Production implementations are the HTTP clients in `storyloom_clients`
//! and the JSON-snapshot stores in `storyloom_storage`; in-memory twins
//! exist for tests and demos.
//!
//! # Example
//!
//! ```rust,ignore
//! use storyloom::{StoryloomConfig, telemetry};
//!
//! #[tokio::main]
//! async fn main() -> storyloom::StoryloomResult<()> {
//!     telemetry::init_telemetry();
//!     let app = StoryloomConfig::from_file("storyloom.toml")?.wire()?;
//!     app.start_replay_worker();
//!     let entry = storyloom::JournalEntry::new(
//!         "entry-1",
//!         "I learned fractions today",
//!         chrono::Utc::now(),
//!     );
//!     let outcome = app
//!         .pipeline()
//!         .generate_story(&entry, "fantasy", "user-1", "Sam")
//!         .await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod telemetry;

pub use config::{StoryloomApp, StoryloomConfig};

// Error taxonomy
pub use storyloom_error::{StoryloomError, StoryloomErrorKind, StoryloomResult};

// Domain types
pub use storyloom_core::{
    GeneratedChapter, JournalEntry, MAX_PREVIOUS_ARCS, NewStoryNode, OfflineRequest,
    OfflineRequestKind, PreviousArc, StoryChapter, StoryMetadata, StoryNode,
};

// Trait seams and observable state
pub use storyloom_interface::{
    ChapterGenerator, DrainReport, ErrorSink, GenerationOutcome, MetadataExtractor,
    NetworkMonitor, OfflineQueue, PipelineEvent, PipelineStage, StoryRepository,
};

// Concrete implementations
pub use storyloom_clients::{ClientConfig, HttpChapterGenerator, HttpMetadataExtractor};
pub use storyloom_pipeline::{StoryPipeline, TracingErrorSink, WatchConnectivityMonitor};
pub use storyloom_storage::{
    InMemoryOfflineQueue, InMemoryStoryStore, JsonOfflineQueue, JsonStoryStore,
};
