//! Trait seams between the orchestrator and its collaborators.

use async_trait::async_trait;
use storyloom_core::{
    ChapterPrompt, GeneratedChapter, NewStoryNode, OfflineRequest, PreviousArc, StoryChapter,
    StoryMetadata, StoryNode,
};
use storyloom_error::{StoryloomError, StoryloomResult};
use uuid::Uuid;

/// Remote metadata extraction: raw entry text in, structured metadata out.
///
/// Pure remote call, no retries; retry policy belongs to the orchestrator
/// and the offline queue.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Extract sentiment, themes, entities and key phrases from entry text.
    async fn extract_metadata(&self, text: &str) -> StoryloomResult<StoryMetadata>;
}

/// Remote chapter generation: metadata plus continuity context in, a
/// generated chapter out.
#[async_trait]
pub trait ChapterGenerator: Send + Sync {
    /// Generate the next chapter for the given prompt.
    async fn generate_chapter(&self, prompt: &ChapterPrompt) -> StoryloomResult<GeneratedChapter>;
}

/// Durable CRUD over the story graph plus derived continuity queries.
///
/// Concurrent reads are always safe. The read-then-write sequence that
/// derives a node's parent must be serialized, which is why
/// [`append_story`](StoryRepository::append_story) exists: it computes the
/// parent and inserts chapter and node under one writer lock.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Save a chapter. Idempotent by chapter id; re-saving the same id
    /// overwrites (last write wins), since retried offline replays may
    /// resubmit the same artifact.
    async fn save_chapter(&self, chapter: &StoryChapter) -> StoryloomResult<()>;

    /// Save a node. Fails with an integrity error if the referenced
    /// chapter has not been saved, or if the parent id dangles.
    async fn save_story_node(&self, node: &StoryNode) -> StoryloomResult<()>;

    /// Atomically derive the parent from the latest node, then save the
    /// chapter and its node as one logical transaction. Returns the
    /// materialized node.
    async fn append_story(
        &self,
        chapter: &StoryChapter,
        node: &NewStoryNode,
    ) -> StoryloomResult<StoryNode>;

    /// The `limit` most recent arcs, most-recent-first by `created_at`
    /// descending, ties broken by chapter id descending lexicographic.
    async fn previous_story_arcs(&self, limit: usize) -> StoryloomResult<Vec<PreviousArc>>;

    /// Look up a chapter by id.
    async fn get_chapter(&self, chapter_id: &str) -> StoryloomResult<Option<StoryChapter>>;

    /// All nodes, for visualization and export collaborators.
    async fn all_story_nodes(&self) -> StoryloomResult<Vec<StoryNode>>;
}

/// Durable FIFO log of operations deferred due to lost connectivity.
#[async_trait]
pub trait OfflineQueue: Send + Sync {
    /// Append a request; persisted before returning.
    async fn add_request(&self, request: &OfflineRequest) -> StoryloomResult<()>;

    /// Pending requests in enqueue order.
    async fn pending_requests(&self) -> StoryloomResult<Vec<OfflineRequest>>;

    /// Remove a request once its replay fully completed (remote calls and
    /// persistence).
    async fn remove_request(&self, id: &Uuid) -> StoryloomResult<()>;

    /// Record a failed replay attempt; the bumped count is persisted.
    async fn record_attempt(&self, id: &Uuid) -> StoryloomResult<u32>;

    /// Number of pending requests.
    async fn len(&self) -> StoryloomResult<usize>;

    /// Whether the queue is empty.
    async fn is_empty(&self) -> StoryloomResult<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Boundary collaborator exposing connectivity state.
///
/// This core consumes a boolean "is connected" signal and an edge event on
/// reconnect; how connectivity is determined is the monitor's business.
pub trait NetworkMonitor: Send + Sync {
    /// Current connectivity.
    fn is_connected(&self) -> bool;

    /// Subscribe to connectivity changes. The receiver yields the new
    /// connected state; an offline→online edge is the replay trigger.
    fn subscribe(&self) -> tokio::sync::watch::Receiver<bool>;
}

/// Fire-and-forget sink for surfacing terminal failures to the UI layer.
pub trait ErrorSink: Send + Sync {
    /// Report a failure; no return value is consumed by this core.
    fn report(&self, context: &str, error: &StoryloomError);
}
