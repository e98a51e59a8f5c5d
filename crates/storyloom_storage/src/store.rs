//! Durable JSON-snapshot implementation of the story repository.

use crate::{StoryGraph, snapshot};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyloom_core::{NewStoryNode, PreviousArc, StoryChapter, StoryNode};
use storyloom_error::StoryloomResult;
use storyloom_interface::StoryRepository;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

const STORE_FILE: &str = "story_graph.json";

/// File-backed story repository.
///
/// The whole graph lives in memory under a single `RwLock`; every mutation
/// rewrites the snapshot via temp file + atomic rename while still holding
/// the write guard. That one guard is also the writer lock that serializes
/// the derive-parent-then-insert sequence in
/// [`append_story`](StoryRepository::append_story), so concurrent
/// generations cannot both observe the same "most recent arc".
///
/// Snapshot writes are synchronous `std::fs` calls made while the guard is
/// held; a snapshot is one journal's graph, small enough to write inline.
/// A failed persist surfaces to the caller while the in-memory mutation
/// remains; the next successful persist rewrites the full snapshot and
/// disk catches up.
#[derive(Debug, Clone)]
pub struct JsonStoryStore {
    path: PathBuf,
    graph: Arc<RwLock<StoryGraph>>,
}

impl JsonStoryStore {
    /// Open (or create) a store under the given directory.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the directory cannot be created or
    /// an existing snapshot cannot be read.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> StoryloomResult<Self> {
        let dir = dir.as_ref();
        snapshot::ensure_dir(dir)?;
        let path = dir.join(STORE_FILE);
        let graph: StoryGraph = snapshot::load_or_default(&path)?;
        debug!(
            chapters = graph.chapter_count(),
            nodes = graph.node_count(),
            "Loaded story graph"
        );
        Ok(Self {
            path,
            graph: Arc::new(RwLock::new(graph)),
        })
    }
}

#[async_trait]
impl StoryRepository for JsonStoryStore {
    async fn save_chapter(&self, chapter: &StoryChapter) -> StoryloomResult<()> {
        let mut graph = self.graph.write().await;
        graph.insert_chapter(chapter);
        snapshot::persist(&self.path, &*graph)
    }

    async fn save_story_node(&self, node: &StoryNode) -> StoryloomResult<()> {
        let mut graph = self.graph.write().await;
        graph.insert_node(node)?;
        snapshot::persist(&self.path, &*graph)
    }

    async fn append_story(
        &self,
        chapter: &StoryChapter,
        node: &NewStoryNode,
    ) -> StoryloomResult<StoryNode> {
        let mut graph = self.graph.write().await;
        let saved = graph.append(chapter, node)?;
        snapshot::persist(&self.path, &*graph)?;
        tracing::info!(
            entry_id = %saved.journal_entry_id(),
            chapter_id = %saved.chapter_id(),
            parent_id = ?saved.parent_id(),
            "Appended story node"
        );
        Ok(saved)
    }

    async fn previous_story_arcs(&self, limit: usize) -> StoryloomResult<Vec<PreviousArc>> {
        Ok(self.graph.read().await.previous_arcs(limit))
    }

    async fn get_chapter(&self, chapter_id: &str) -> StoryloomResult<Option<StoryChapter>> {
        Ok(self.graph.read().await.chapter(chapter_id).cloned())
    }

    async fn all_story_nodes(&self) -> StoryloomResult<Vec<StoryNode>> {
        Ok(self.graph.read().await.nodes())
    }
}
