//! Core data types for the Storyloom narrative pipeline.
//!
//! The story graph is an arena of immutable records addressed by stable
//! string ids: chapters keyed by `chapter_id`, nodes keyed by
//! `journal_entry_id`, with ancestry resolved by explicit lookup rather
//! than embedded pointers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arc;
mod chapter;
mod journal;
mod metadata;
mod node;
mod offline;
mod wire;

pub use arc::{MAX_PREVIOUS_ARCS, PreviousArc};
pub use chapter::{GeneratedChapter, StoryChapter};
pub use journal::JournalEntry;
pub use metadata::StoryMetadata;
pub use node::{NewStoryNode, StoryNode};
pub use offline::{GenerateStoryPayload, OfflineRequest, OfflineRequestKind};
pub use wire::{
    ChapterGenerationRequest, ChapterPrompt, ChapterPromptBuilder, ChapterResponse,
    MetadataRequest, MetadataResponse,
};
