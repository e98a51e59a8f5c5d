//! The story graph: pure, lock-free state shared by both store
//! implementations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storyloom_core::{NewStoryNode, PreviousArc, StoryChapter, StoryNode};
use storyloom_error::{IntegrityError, IntegrityErrorKind, StoryloomResult};

/// Arena of chapters and nodes addressed by stable ids.
///
/// Chapters are keyed by `chapter_id`, nodes by `journal_entry_id`.
/// Ancestry is resolved by lookup, never embedded pointers. All methods
/// are synchronous and pure; callers provide the locking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryGraph {
    chapters: BTreeMap<String, StoryChapter>,
    nodes: BTreeMap<String, StoryNode>,
}

impl StoryGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chapter. Idempotent by chapter id: re-inserting an
    /// existing id overwrites, last write wins, since retried offline
    /// replays may resubmit the same artifact.
    pub fn insert_chapter(&mut self, chapter: &StoryChapter) {
        let replaced = self
            .chapters
            .insert(chapter.chapter_id().clone(), chapter.clone())
            .is_some();
        if replaced {
            tracing::debug!(chapter_id = %chapter.chapter_id(), "Overwrote existing chapter");
        }
    }

    /// Insert a node, re-checking the caller's ordering obligations:
    /// the referenced chapter must exist, the parent (if any) must
    /// reference an existing chapter, and the entry must not already have
    /// a node.
    ///
    /// # Errors
    ///
    /// Returns an integrity error on any violated linkage.
    pub fn insert_node(&mut self, node: &StoryNode) -> StoryloomResult<()> {
        if !self.chapters.contains_key(node.chapter_id()) {
            return Err(IntegrityError::new(IntegrityErrorKind::MissingChapter(
                node.chapter_id().clone(),
            )))?;
        }
        if let Some(parent_id) = node.parent_id()
            && !self.chapters.contains_key(parent_id)
        {
            return Err(IntegrityError::new(IntegrityErrorKind::DanglingParent(
                parent_id.clone(),
            )))?;
        }
        if self.nodes.contains_key(node.journal_entry_id()) {
            return Err(IntegrityError::new(IntegrityErrorKind::DuplicateNode(
                node.journal_entry_id().clone(),
            )))?;
        }

        self.nodes
            .insert(node.journal_entry_id().clone(), node.clone());
        Ok(())
    }

    /// Derive the parent from the latest node, then insert chapter and
    /// node together.
    ///
    /// Idempotent by journal entry id: if the entry already has a node
    /// (a crash after persist but before queue removal, replayed), the
    /// existing node is returned unchanged and nothing is written.
    pub fn append(
        &mut self,
        chapter: &StoryChapter,
        node: &NewStoryNode,
    ) -> StoryloomResult<StoryNode> {
        if let Some(existing) = self.nodes.get(node.journal_entry_id()) {
            tracing::debug!(
                entry_id = %node.journal_entry_id(),
                chapter_id = %existing.chapter_id(),
                "Entry already has a node, append is a no-op"
            );
            return Ok(existing.clone());
        }

        let parent_id = self.latest_node().map(|n| n.chapter_id().clone());
        let node = node.clone().into_node(chapter.chapter_id().clone(), parent_id);

        self.insert_chapter(chapter);
        self.insert_node(&node)?;
        Ok(node)
    }

    /// The `limit` most recent arcs, most-recent-first.
    pub fn previous_arcs(&self, limit: usize) -> Vec<PreviousArc> {
        let mut nodes: Vec<&StoryNode> = self.nodes.values().collect();
        nodes.sort_by(Self::continuity_order);
        nodes.into_iter().take(limit).map(PreviousArc::from).collect()
    }

    /// Look up a chapter by id.
    pub fn chapter(&self, chapter_id: &str) -> Option<&StoryChapter> {
        self.chapters.get(chapter_id)
    }

    /// All nodes, unsorted.
    pub fn nodes(&self) -> Vec<StoryNode> {
        self.nodes.values().cloned().collect()
    }

    /// Number of chapters in the graph.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn latest_node(&self) -> Option<&StoryNode> {
        let mut nodes: Vec<&StoryNode> = self.nodes.values().collect();
        nodes.sort_by(Self::continuity_order);
        nodes.first().copied()
    }

    /// The continuity ordering: `created_at` descending, ties broken by
    /// chapter id descending lexicographic. Deliberately not insertion
    /// order: replayed historical entries sort by their creation instant.
    fn continuity_order(a: &&StoryNode, b: &&StoryNode) -> std::cmp::Ordering {
        b.created_at()
            .cmp(a.created_at())
            .then_with(|| b.chapter_id().cmp(a.chapter_id()))
    }
}
