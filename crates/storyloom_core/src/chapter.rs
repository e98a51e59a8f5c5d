//! Generated chapter artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated narrative chapter, owned by the persistence manager once
/// saved and immutable after creation.
///
/// Identity is the server-assigned `chapter_id`.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct StoryChapter {
    /// Server-assigned chapter identity
    chapter_id: String,
    /// Generated prose
    text: String,
    /// Closing hook for the next chapter
    cliffhanger: String,
    /// Foreign key to the external journal entry
    originating_entry_id: String,
    /// When the chapter was produced
    timestamp: DateTime<Utc>,
}

impl StoryChapter {
    /// Create a chapter record.
    pub fn new(
        chapter_id: impl Into<String>,
        text: impl Into<String>,
        cliffhanger: impl Into<String>,
        originating_entry_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            text: text.into(),
            cliffhanger: cliffhanger.into(),
            originating_entry_id: originating_entry_id.into(),
            timestamp,
        }
    }
}

/// The generation client's output, before the orchestrator binds it to an
/// originating entry and persists it as a [`StoryChapter`].
///
/// `feedback` and `student_name` are surfaced to the caller but not
/// persisted on the chapter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GeneratedChapter {
    /// Server-assigned chapter identity
    chapter_id: String,
    /// Generated prose
    text: String,
    /// Closing hook for the next chapter
    cliffhanger: String,
    /// Encouraging feedback for the journal author
    feedback: String,
    /// Echo of the student name the chapter was written for
    student_name: String,
}

impl GeneratedChapter {
    /// Create a generation result.
    pub fn new(
        chapter_id: impl Into<String>,
        text: impl Into<String>,
        cliffhanger: impl Into<String>,
        feedback: impl Into<String>,
        student_name: impl Into<String>,
    ) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            text: text.into(),
            cliffhanger: cliffhanger.into(),
            feedback: feedback.into(),
            student_name: student_name.into(),
        }
    }

    /// Bind this result to its originating journal entry, producing the
    /// persistable chapter record.
    pub fn into_chapter(
        self,
        originating_entry_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> StoryChapter {
        StoryChapter {
            chapter_id: self.chapter_id,
            text: self.text,
            cliffhanger: self.cliffhanger,
            originating_entry_id: originating_entry_id.into(),
            timestamp,
        }
    }
}
