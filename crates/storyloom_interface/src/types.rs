//! Observable pipeline state shared with the presentation layer.

use serde::{Deserialize, Serialize};
use storyloom_core::StoryNode;
use uuid::Uuid;

/// The fixed progress checkpoints of a successful run.
///
/// The fractions are a published contract: for any successful run the
/// observed sequence is exactly `[0.0, 0.25, 0.5, 0.75, 1.0]`, strictly
/// monotonic, no repeats.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStage {
    /// Calling the metadata extraction endpoint
    ExtractingMetadata,
    /// Metadata received, preparing the generation prompt
    MetadataExtracted,
    /// Calling the chapter generation endpoint
    GeneratingChapter,
    /// Saving chapter and node
    Persisting,
    /// Chapter and node saved
    Complete,
}

impl PipelineStage {
    /// Progress fraction published at this checkpoint.
    pub fn progress(&self) -> f32 {
        match self {
            Self::ExtractingMetadata => 0.0,
            Self::MetadataExtracted => 0.25,
            Self::GeneratingChapter => 0.5,
            Self::Persisting => 0.75,
            Self::Complete => 1.0,
        }
    }

    /// Human-readable step label for UI consumption.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExtractingMetadata => "Reading your journal entry",
            Self::MetadataExtracted => "Gathering story threads",
            Self::GeneratingChapter => "Writing your chapter",
            Self::Persisting => "Saving your story",
            Self::Complete => "Chapter ready",
        }
    }
}

/// Immutable state-transition snapshots emitted by the orchestrator.
///
/// The presentation layer subscribes to these; the orchestrator owns the
/// single source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// A checkpoint on the successful path
    Progress {
        /// Journal entry the run is for
        entry_id: String,
        /// Which checkpoint
        stage: PipelineStage,
        /// `stage.progress()`, duplicated for direct binding
        progress: f32,
        /// `stage.label()`, duplicated for direct binding
        label: String,
    },
    /// The run was deferred to the offline queue
    Queued {
        /// Journal entry the run is for
        entry_id: String,
        /// Queue identity of the captured request
        request_id: Uuid,
    },
    /// Terminal failure; the error kind is preserved for messaging
    Failed {
        /// Journal entry the run is for
        entry_id: String,
        /// Stable error category ("network", "storage", ...)
        category: String,
        /// Rendered error message
        message: String,
    },
}

impl PipelineEvent {
    /// Build a progress event for a stage.
    pub fn progress(entry_id: impl Into<String>, stage: PipelineStage) -> Self {
        Self::Progress {
            entry_id: entry_id.into(),
            stage,
            progress: stage.progress(),
            label: stage.label().to_string(),
        }
    }
}

/// Outcome of submitting an entry to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The full pipeline ran; the node is persisted
    Completed(StoryNode),
    /// Offline: the request was captured for later replay. Terminal for
    /// this invocation; the user is notified, not blocked.
    Queued(Uuid),
}

/// Result of a queue drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Requests fully replayed and removed
    pub replayed: usize,
    /// Requests still pending after the drain
    pub remaining: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn checkpoints_are_strictly_monotonic() {
        let fractions: Vec<f32> = PipelineStage::iter().map(|s| s.progress()).collect();
        assert_eq!(fractions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn progress_event_carries_stage_fields() {
        let event = PipelineEvent::progress("entry-1", PipelineStage::GeneratingChapter);
        match event {
            PipelineEvent::Progress {
                progress, label, ..
            } => {
                assert_eq!(progress, 0.5);
                assert_eq!(label, "Writing your chapter");
            }
            _ => panic!("expected progress event"),
        }
    }
}
