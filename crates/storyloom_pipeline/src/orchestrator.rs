//! The pipeline orchestrator state machine.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use storyloom_core::{
    ChapterPrompt, GenerateStoryPayload, JournalEntry, MAX_PREVIOUS_ARCS, NewStoryNode, StoryNode,
};
use storyloom_error::{StoryloomError, StoryloomResult, ValidationError};
use storyloom_interface::{
    ChapterGenerator, DrainReport, ErrorSink, GenerationOutcome, MetadataExtractor, NetworkMonitor,
    OfflineQueue, PipelineEvent, PipelineStage, StoryRepository,
};
use tokio::sync::{Mutex, broadcast};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// After this many failed replay attempts for one request, the failure is
/// surfaced through the error sink (once, at the threshold crossing); the
/// request stays queued for the next reconnect. Below the threshold,
/// replay failures stay silent to avoid notification spam.
pub const REPLAY_SURFACE_THRESHOLD: u32 = 3;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Sequences extraction → generation → persistence for one journal entry,
/// branching to the offline queue when connectivity is missing.
///
/// All collaborators are injected; the pipeline owns no global state. The
/// observable contract: every successful run publishes exactly the
/// checkpoints `[0.0, 0.25, 0.5, 0.75, 1.0]` in order, and queued or
/// failed runs publish a `Queued` or `Failed` event instead.
pub struct StoryPipeline {
    extractor: Arc<dyn MetadataExtractor>,
    generator: Arc<dyn ChapterGenerator>,
    repository: Arc<dyn StoryRepository>,
    queue: Arc<dyn OfflineQueue>,
    monitor: Arc<dyn NetworkMonitor>,
    error_sink: Arc<dyn ErrorSink>,
    events: broadcast::Sender<PipelineEvent>,
    // One drain at a time; concurrent replay of the same queue would risk
    // duplicate chapter generation for the same entry.
    drain_lock: Mutex<()>,
    replay_surface_threshold: u32,
}

/// Builder for [`StoryPipeline`].
pub struct StoryPipelineBuilder {
    extractor: Arc<dyn MetadataExtractor>,
    generator: Arc<dyn ChapterGenerator>,
    repository: Arc<dyn StoryRepository>,
    queue: Arc<dyn OfflineQueue>,
    monitor: Arc<dyn NetworkMonitor>,
    error_sink: Arc<dyn ErrorSink>,
    replay_surface_threshold: u32,
}

impl StoryPipelineBuilder {
    /// Replace the default tracing error sink.
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }

    /// Override the replay-failure surfacing threshold (tests only need
    /// smaller values; production keeps the default).
    pub fn with_replay_surface_threshold(mut self, threshold: u32) -> Self {
        self.replay_surface_threshold = threshold;
        self
    }

    /// Finish the pipeline.
    pub fn build(self) -> Arc<StoryPipeline> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(StoryPipeline {
            extractor: self.extractor,
            generator: self.generator,
            repository: self.repository,
            queue: self.queue,
            monitor: self.monitor,
            error_sink: self.error_sink,
            events,
            drain_lock: Mutex::new(()),
            replay_surface_threshold: self.replay_surface_threshold,
        })
    }
}

impl StoryPipeline {
    /// Start building a pipeline from its five required collaborators.
    pub fn builder(
        extractor: Arc<dyn MetadataExtractor>,
        generator: Arc<dyn ChapterGenerator>,
        repository: Arc<dyn StoryRepository>,
        queue: Arc<dyn OfflineQueue>,
        monitor: Arc<dyn NetworkMonitor>,
    ) -> StoryPipelineBuilder {
        StoryPipelineBuilder {
            extractor,
            generator,
            repository,
            queue,
            monitor,
            error_sink: Arc::new(crate::TracingErrorSink::new()),
            replay_surface_threshold: REPLAY_SURFACE_THRESHOLD,
        }
    }

    /// Subscribe to pipeline events. Snapshots are immutable; the
    /// presentation layer holds no other shared state with the pipeline.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Run the full pipeline for a journal entry.
    ///
    /// Empty or whitespace-only entry text is rejected with a validation
    /// error before the connectivity check; an unusable entry is never
    /// queued. Offline (or a not-connected failure during extraction)
    /// captures a durable request and returns
    /// [`GenerationOutcome::Queued`]; that is terminal for this
    /// invocation. Any other failure is terminal with the error kind
    /// preserved; nothing is persisted and nothing is retried
    /// automatically.
    #[instrument(skip(self, entry), fields(entry_id = %entry.id(), genre = %genre))]
    pub async fn generate_story(
        &self,
        entry: &JournalEntry,
        genre: &str,
        user_id: &str,
        student_name: &str,
    ) -> StoryloomResult<GenerationOutcome> {
        if entry.content().trim().is_empty() {
            let e = StoryloomError::from(ValidationError::new(format!(
                "Journal entry {} has no text to narrate",
                entry.id()
            )));
            self.emit(PipelineEvent::Failed {
                entry_id: entry.id().clone(),
                category: e.category().to_string(),
                message: e.to_string(),
            });
            self.error_sink.report("story generation", &e);
            return Err(e);
        }

        let payload = GenerateStoryPayload::new(
            entry.id().clone(),
            entry.content().clone(),
            genre,
            user_id,
            student_name,
        );

        if !self.monitor.is_connected() {
            let request_id = self.enqueue(payload).await?;
            return Ok(GenerationOutcome::Queued(request_id));
        }

        match self.run_stages(&payload, Utc::now()).await {
            Ok(node) => Ok(GenerationOutcome::Completed(node)),
            // The monitor can be stale; a connect failure during
            // extraction is still the offline branch.
            Err(e) if e.is_not_connected() => {
                let request_id = self.enqueue(payload).await?;
                Ok(GenerationOutcome::Queued(request_id))
            }
            Err(e) => {
                self.emit(PipelineEvent::Failed {
                    entry_id: payload.entry_id().clone(),
                    category: e.category().to_string(),
                    message: e.to_string(),
                });
                self.error_sink.report("story generation", &e);
                Err(e)
            }
        }
    }

    /// Replay queued requests in FIFO order, one at a time.
    ///
    /// A request is removed only after its replay fully completed (remote
    /// calls and persistence). A network-class failure stops the drain:
    /// connectivity is evidently gone again, and everything from the
    /// failed request onward keeps its queue position. Other failures
    /// leave the request in place and move on. Failures are silent until
    /// a request crosses the surfacing threshold.
    #[instrument(skip(self))]
    pub async fn drain_queue(&self) -> StoryloomResult<DrainReport> {
        let _guard = self.drain_lock.lock().await;

        let pending = self.queue.pending_requests().await?;
        info!(pending = pending.len(), "Draining offline queue");

        let mut replayed = 0usize;
        for request in pending {
            let payload = match GenerateStoryPayload::from_request(&request) {
                Ok(payload) => payload,
                Err(e) => {
                    // A corrupt payload can never replay; drop it rather
                    // than poison the queue.
                    warn!(request_id = %request.id(), error = %e, "Dropping undecodable request");
                    self.error_sink.report("offline replay", &e);
                    self.queue.remove_request(request.id()).await?;
                    continue;
                }
            };

            match self.run_stages(&payload, *request.created_at()).await {
                Ok(_) => {
                    self.queue.remove_request(request.id()).await?;
                    replayed += 1;
                }
                Err(e) => {
                    let attempts = self.queue.record_attempt(request.id()).await?;
                    if attempts == self.replay_surface_threshold {
                        self.error_sink.report("offline replay", &e);
                    }
                    if e.is_network() {
                        warn!(
                            request_id = %request.id(),
                            attempts,
                            "Connectivity lost during replay, stopping drain"
                        );
                        break;
                    }
                    warn!(request_id = %request.id(), attempts, error = %e, "Replay failed");
                }
            }
        }

        let remaining = self.queue.len().await?;
        info!(replayed, remaining, "Drain finished");
        Ok(DrainReport { replayed, remaining })
    }

    /// Spawn the replay worker: drains the queue whenever a connectivity
    /// change lands on connected. Returns the worker task handle.
    ///
    /// The state is re-read with `borrow_and_update` so a flip that lands
    /// between subscription and the task's first poll is still observed as
    /// a change; the monitor only notifies on actual transitions, so a
    /// change whose new value is connected is the reconnect edge.
    pub fn run_replay_worker(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let mut rx = self.monitor.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if !*rx.borrow_and_update() {
                    continue;
                }
                info!("Connectivity restored, replaying offline queue");
                if let Err(e) = self.drain_queue().await {
                    self.error_sink.report("offline replay", &e);
                }
            }
        })
    }

    /// The online path: extract → generate → persist, with the fixed
    /// progress checkpoints. Persistence happens only after both remote
    /// calls succeed, so cancelling an in-flight run never leaves a
    /// partially written chapter.
    async fn run_stages(
        &self,
        payload: &GenerateStoryPayload,
        created_at: DateTime<Utc>,
    ) -> StoryloomResult<StoryNode> {
        let entry_id = payload.entry_id().clone();

        self.emit_stage(&entry_id, PipelineStage::ExtractingMetadata);
        let metadata = self.extractor.extract_metadata(payload.entry_text()).await?;
        self.emit_stage(&entry_id, PipelineStage::MetadataExtracted);

        let arcs = self.repository.previous_story_arcs(MAX_PREVIOUS_ARCS).await?;

        self.emit_stage(&entry_id, PipelineStage::GeneratingChapter);
        let prompt = ChapterPrompt::builder()
            .metadata(metadata.clone())
            .user_id(payload.user_id().clone())
            .genre(payload.genre().clone())
            .student_name(payload.student_name().clone())
            .previous_arcs(arcs)
            .build()
            .map_err(|e| {
                StoryloomError::from(storyloom_error::UnknownError::new(format!(
                    "Failed to build chapter prompt: {}",
                    e
                )))
            })?;
        let generated = self.generator.generate_chapter(&prompt).await?;

        self.emit_stage(&entry_id, PipelineStage::Persisting);
        let chapter = generated.into_chapter(entry_id.clone(), Utc::now());
        let seed = NewStoryNode::new(entry_id.clone(), metadata, created_at);
        let node = self.repository.append_story(&chapter, &seed).await?;

        self.emit_stage(&entry_id, PipelineStage::Complete);
        info!(
            entry_id = %entry_id,
            chapter_id = %node.chapter_id(),
            parent_id = ?node.parent_id(),
            "Story chapter complete"
        );
        Ok(node)
    }

    async fn enqueue(&self, payload: GenerateStoryPayload) -> StoryloomResult<Uuid> {
        let entry_id = payload.entry_id().clone();
        let request = payload.into_request();
        let request_id = *request.id();
        self.queue.add_request(&request).await?;
        info!(entry_id = %entry_id, request_id = %request_id, "Offline, entry queued");
        self.emit(PipelineEvent::Queued {
            entry_id,
            request_id,
        });
        Ok(request_id)
    }

    fn emit_stage(&self, entry_id: &str, stage: PipelineStage) {
        self.emit(PipelineEvent::progress(entry_id, stage));
    }

    fn emit(&self, event: PipelineEvent) {
        // Nobody listening is fine; the pipeline does not depend on the
        // presentation layer.
        let _ = self.events.send(event);
    }
}
