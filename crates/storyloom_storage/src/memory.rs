//! In-memory store and queue for tests and demos.
//!
//! Same semantics as the JSON-backed implementations minus durability; all
//! data is lost when dropped.

use crate::StoryGraph;
use async_trait::async_trait;
use std::sync::Arc;
use storyloom_core::{NewStoryNode, OfflineRequest, PreviousArc, StoryChapter, StoryNode};
use storyloom_error::{StoryloomResult, UnknownError};
use storyloom_interface::{OfflineQueue, StoryRepository};
use tokio::sync::RwLock;

/// In-memory story repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryStore {
    graph: Arc<RwLock<StoryGraph>>,
}

impl InMemoryStoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chapters (for testing).
    pub async fn chapter_count(&self) -> usize {
        self.graph.read().await.chapter_count()
    }

    /// Number of stored nodes (for testing).
    pub async fn node_count(&self) -> usize {
        self.graph.read().await.node_count()
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryStore {
    async fn save_chapter(&self, chapter: &StoryChapter) -> StoryloomResult<()> {
        self.graph.write().await.insert_chapter(chapter);
        Ok(())
    }

    async fn save_story_node(&self, node: &StoryNode) -> StoryloomResult<()> {
        self.graph.write().await.insert_node(node)
    }

    async fn append_story(
        &self,
        chapter: &StoryChapter,
        node: &NewStoryNode,
    ) -> StoryloomResult<StoryNode> {
        self.graph.write().await.append(chapter, node)
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

/// In-memory offline queue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOfflineQueue {
    requests: Arc<RwLock<Vec<OfflineRequest>>>,
}

impl InMemoryOfflineQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfflineQueue for InMemoryOfflineQueue {
    async fn add_request(&self, request: &OfflineRequest) -> StoryloomResult<()> {
        self.requests.write().await.push(request.clone());
        Ok(())
    }

    async fn pending_requests(&self) -> StoryloomResult<Vec<OfflineRequest>> {
        Ok(self.requests.read().await.clone())
    }

    async fn remove_request(&self, id: &uuid::Uuid) -> StoryloomResult<()> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| r.id() != id);
        if requests.len() == before {
            return Err(UnknownError::new(format!(
                "Offline request {} not found",
                id
            )))?;
        }
        Ok(())
    }

    async fn record_attempt(&self, id: &uuid::Uuid) -> StoryloomResult<u32> {
        let mut requests = self.requests.write().await;
        let request = requests.iter_mut().find(|r| r.id() == id).ok_or_else(|| {
            storyloom_error::StoryloomError::from(UnknownError::new(format!(
                "Offline request {} not found",
                id
            )))
        })?;
        *request = request.with_attempt_recorded();
        Ok(*request.attempts())
    }

    async fn len(&self) -> StoryloomResult<usize> {
        Ok(self.requests.read().await.len())
    }
}
