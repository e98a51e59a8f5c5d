//! Story nodes: the journal-entry-to-chapter link records.

use crate::StoryMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One journal-entry-to-chapter link record with optional parent.
///
/// Identity is the `journal_entry_id` (one node per journal entry). A node
/// is created exactly once per successful generation and is otherwise
/// immutable; corrections require generating a new node.
///
/// `parent_id`, if present, references the `chapter_id` of the most recent
/// prior node at creation time. The model supports branching, though the
/// pipeline builds a chronological chain.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct StoryNode {
    /// Identity: the originating journal entry
    journal_entry_id: String,
    /// 1:1 link to the generated chapter
    chapter_id: String,
    /// Chapter id of the most recent prior node, if any
    parent_id: Option<String>,
    /// Snapshot of the extracted metadata at generation time
    metadata: StoryMetadata,
    /// Creation instant; the continuity ordering key
    created_at: DateTime<Utc>,
}

impl StoryNode {
    /// Create a node record.
    pub fn new(
        journal_entry_id: impl Into<String>,
        chapter_id: impl Into<String>,
        parent_id: Option<String>,
        metadata: StoryMetadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            journal_entry_id: journal_entry_id.into(),
            chapter_id: chapter_id.into(),
            parent_id,
            metadata,
            created_at,
        }
    }
}

/// The node-to-be handed to the repository's atomic append.
///
/// `parent_id` is deliberately absent: the repository derives it from the
/// latest node under its writer lock, so two concurrent generations cannot
/// both claim the same parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct NewStoryNode {
    /// Identity: the originating journal entry
    journal_entry_id: String,
    /// Snapshot of the extracted metadata at generation time
    metadata: StoryMetadata,
    /// Creation instant
    created_at: DateTime<Utc>,
}

impl NewStoryNode {
    /// Create a pending node.
    pub fn new(
        journal_entry_id: impl Into<String>,
        metadata: StoryMetadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            journal_entry_id: journal_entry_id.into(),
            metadata,
            created_at,
        }
    }

    /// Materialize the node once the repository has resolved its chapter
    /// and parent linkage.
    pub fn into_node(self, chapter_id: impl Into<String>, parent_id: Option<String>) -> StoryNode {
        StoryNode {
            journal_entry_id: self.journal_entry_id,
            chapter_id: chapter_id.into(),
            parent_id,
            metadata: self.metadata,
            created_at: self.created_at,
        }
    }
}
