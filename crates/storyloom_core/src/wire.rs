//! Wire formats for the two remote endpoints.
//!
//! Field names are camelCase on the wire; conversions to and from the
//! domain types live here so the clients stay thin.

use crate::{GeneratedChapter, MAX_PREVIOUS_ARCS, PreviousArc, StoryMetadata};
use serde::{Deserialize, Serialize};

/// Request body for the metadata extraction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRequest {
    /// Raw journal-entry text
    pub text: String,
}

/// Response body from the metadata extraction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    /// Sentiment label (e.g. "positive")
    pub sentiment: String,
    /// Theme strings
    pub themes: Vec<String>,
    /// Entity strings
    pub entities: Vec<String>,
    /// Key-phrase strings
    pub key_phrases: Vec<String>,
}

impl From<MetadataResponse> for StoryMetadata {
    fn from(response: MetadataResponse) -> Self {
        StoryMetadata::new(
            response.sentiment,
            response.themes,
            response.entities,
            response.key_phrases,
        )
    }
}

impl From<&StoryMetadata> for MetadataResponse {
    fn from(metadata: &StoryMetadata) -> Self {
        Self {
            sentiment: metadata.sentiment_label().clone(),
            themes: metadata.themes().clone(),
            entities: metadata.entities().clone(),
            key_phrases: metadata.key_phrases().clone(),
        }
    }
}

/// Domain-side input to chapter generation.
///
/// The previous-arcs list is the continuity window, most-recent-first and
/// capped at [`MAX_PREVIOUS_ARCS`]; the cap is enforced at conversion, not
/// trusted to the caller.
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ChapterPrompt {
    /// Extracted metadata for the entry being narrated
    metadata: StoryMetadata,
    /// Caller identifier
    user_id: String,
    /// Genre tag
    genre: String,
    /// Name the chapter is written for
    student_name: String,
    /// Continuity window, most-recent-first
    #[builder(default)]
    previous_arcs: Vec<PreviousArc>,
}

impl ChapterPrompt {
    /// Builder for a chapter prompt.
    pub fn builder() -> ChapterPromptBuilder {
        ChapterPromptBuilder::default()
    }

    /// The continuity window, truncated to the hard cap.
    pub fn bounded_arcs(&self) -> &[PreviousArc] {
        let end = self.previous_arcs.len().min(MAX_PREVIOUS_ARCS);
        &self.previous_arcs[..end]
    }
}

/// Request body for the chapter generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterGenerationRequest {
    /// Extracted metadata, echoed in wire shape
    pub metadata: MetadataResponse,
    /// Caller identifier
    pub user_id: String,
    /// Genre tag
    pub genre: String,
    /// Name the chapter is written for
    pub student_name: String,
    /// Rendered continuity lines, most-recent-first, at most
    /// [`MAX_PREVIOUS_ARCS`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_arcs: Option<Vec<String>>,
}

impl From<&ChapterPrompt> for ChapterGenerationRequest {
    fn from(prompt: &ChapterPrompt) -> Self {
        let arcs = prompt.bounded_arcs();
        Self {
            metadata: prompt.metadata().into(),
            user_id: prompt.user_id().clone(),
            genre: prompt.genre().clone(),
            student_name: prompt.student_name().clone(),
            previous_arcs: if arcs.is_empty() {
                None
            } else {
                Some(arcs.iter().map(PreviousArc::prompt_line).collect())
            },
        }
    }
}

/// Response body from the chapter generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    /// Server-assigned chapter identity
    pub chapter_id: String,
    /// Generated prose
    pub text: String,
    /// Closing hook for the next chapter
    pub cliffhanger: String,
    /// Echo of the student name
    pub student_name: String,
    /// Encouraging feedback for the journal author
    pub feedback: String,
}

impl From<ChapterResponse> for GeneratedChapter {
    fn from(response: ChapterResponse) -> Self {
        GeneratedChapter::new(
            response.chapter_id,
            response.text,
            response.cliffhanger,
            response.feedback,
            response.student_name,
        )
    }
}
