//! Integration tests for the story pipeline: progress contract, offline
//! round trip, replay ordering, and failure semantics.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storyloom_core::{
    ChapterPrompt, GeneratedChapter, JournalEntry, OfflineRequest, OfflineRequestKind,
    StoryMetadata,
};
use storyloom_error::{DecodeError, NetworkError, NetworkErrorKind, StoryloomError, StoryloomResult};
use storyloom_interface::{
    ChapterGenerator, ErrorSink, GenerationOutcome, MetadataExtractor, NetworkMonitor,
    OfflineQueue, PipelineEvent, StoryRepository,
};
use storyloom_pipeline::{StoryPipeline, WatchConnectivityMonitor};
use storyloom_storage::{InMemoryOfflineQueue, InMemoryStoryStore};
use tokio::sync::Mutex;

/// One scripted behavior for a stubbed remote call.
#[derive(Debug, Clone, Copy)]
enum Step {
    Ok,
    NotConnected,
    ServerError,
    BadResponse,
}

impl Step {
    fn to_error(self) -> Option<StoryloomError> {
        match self {
            Step::Ok => None,
            Step::NotConnected => Some(NetworkError::new(NetworkErrorKind::NotConnected).into()),
            Step::ServerError => Some(
                NetworkError::new(NetworkErrorKind::Status {
                    status: 500,
                    message: "boom".into(),
                })
                .into(),
            ),
            Step::BadResponse => Some(DecodeError::new("unexpected body").into()),
        }
    }
}

struct StubExtractor {
    metadata: StoryMetadata,
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl StubExtractor {
    fn new(metadata: StoryMetadata) -> Self {
        Self {
            metadata,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    async fn push_steps(&self, steps: &[Step]) {
        self.script.lock().await.extend(steps.iter().copied());
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
    async fn extract_metadata(&self, _text: &str) -> StoryloomResult<StoryMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().await.pop_front().unwrap_or(Step::Ok);
        match step.to_error() {
            Some(e) => Err(e),
            None => Ok(self.metadata.clone()),
        }
    }
}

struct StubGenerator {
    counter: AtomicUsize,
    script: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<ChapterPrompt>>,
}

impl StubGenerator {
    fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    async fn push_steps(&self, steps: &[Step]) {
        self.script.lock().await.extend(steps.iter().copied());
    }

    async fn seen_prompts(&self) -> Vec<ChapterPrompt> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl ChapterGenerator for StubGenerator {
    async fn generate_chapter(&self, prompt: &ChapterPrompt) -> StoryloomResult<GeneratedChapter> {
        self.prompts.lock().await.push(prompt.clone());
        let step = self.script.lock().await.pop_front().unwrap_or(Step::Ok);
        if let Some(e) = step.to_error() {
            return Err(e);
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GeneratedChapter::new(
            format!("ch-{n}"),
            format!("Chapter {n} of the grand tale"),
            "What happens next?",
            "Wonderful noticing!",
            prompt.student_name().clone(),
        ))
    }
}

#[derive(Default)]
struct RecordingSink {
    reports: std::sync::Mutex<Vec<String>>,
}

impl ErrorSink for RecordingSink {
    fn report(&self, context: &str, error: &StoryloomError) {
        self.reports
            .lock()
            .unwrap()
            .push(format!("{}: {}", context, error.category()));
    }
}

struct Harness {
    pipeline: Arc<StoryPipeline>,
    extractor: Arc<StubExtractor>,
    generator: Arc<StubGenerator>,
    store: Arc<InMemoryStoryStore>,
    queue: Arc<InMemoryOfflineQueue>,
    monitor: Arc<WatchConnectivityMonitor>,
    sink: Arc<RecordingSink>,
}

fn harness_with(connected: bool, threshold: u32) -> Harness {
    let extractor = Arc::new(StubExtractor::new(StoryMetadata::new(
        "positive",
        vec!["learning".to_string()],
        vec![],
        vec!["fractions".to_string()],
    )));
    let generator = Arc::new(StubGenerator::new());
    let store = Arc::new(InMemoryStoryStore::new());
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let monitor = Arc::new(WatchConnectivityMonitor::new(connected));
    let sink = Arc::new(RecordingSink::default());

    let pipeline = StoryPipeline::builder(
        extractor.clone() as Arc<dyn MetadataExtractor>,
        generator.clone() as Arc<dyn ChapterGenerator>,
        store.clone() as Arc<dyn StoryRepository>,
        queue.clone() as Arc<dyn OfflineQueue>,
        monitor.clone() as Arc<dyn NetworkMonitor>,
    )
    .with_error_sink(sink.clone() as Arc<dyn ErrorSink>)
    .with_replay_surface_threshold(threshold)
    .build();

    Harness {
        pipeline,
        extractor,
        generator,
        store,
        queue,
        monitor,
        sink,
    }
}

fn harness(connected: bool) -> Harness {
    harness_with(connected, storyloom_pipeline::REPLAY_SURFACE_THRESHOLD)
}

fn entry(id: &str, content: &str) -> JournalEntry {
    JournalEntry::new(id, content, Utc::now())
}

fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn wait_for_empty_queue(h: &Harness) {
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !h.queue.is_empty().await.unwrap() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("queue drained after reconnect");
}

#[tokio::test]
async fn progress_checkpoints_are_exact() {
    let h = harness(true);
    let mut rx = h.pipeline.subscribe();

    h.pipeline
        .generate_story(&entry("entry-1", "I learned fractions today"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();

    let fractions: Vec<f32> = drain_events(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress { progress, .. } => Some(progress),
            _ => None,
        })
        .collect();
    assert_eq!(fractions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
}

#[tokio::test]
async fn first_chapter_for_a_learning_entry() {
    let h = harness(true);

    let outcome = h
        .pipeline
        .generate_story(&entry("entry-1", "I learned fractions today"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();

    let node = match outcome {
        GenerationOutcome::Completed(node) => node,
        other => panic!("expected completion, got {:?}", other),
    };
    assert_eq!(node.parent_id(), &None);
    assert_eq!(node.metadata().themes(), &["learning".to_string()]);

    let chapter = h
        .store
        .get_chapter(node.chapter_id())
        .await
        .unwrap()
        .expect("chapter persisted");
    assert!(!chapter.text().is_empty());
    assert!(!chapter.cliffhanger().is_empty());
    assert_eq!(chapter.originating_entry_id(), "entry-1");
}

#[tokio::test]
async fn offline_submission_round_trips_through_the_queue() {
    let h = harness(false);
    let mut rx = h.pipeline.subscribe();

    let outcome = h
        .pipeline
        .generate_story(&entry("entry-1", "We went stargazing"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();
    assert!(matches!(outcome, GenerationOutcome::Queued(_)));

    // Exactly one request captured, nothing persisted.
    assert_eq!(h.queue.len().await.unwrap(), 1);
    assert_eq!(h.store.chapter_count().await, 0);
    assert_eq!(h.store.node_count().await, 0);
    assert!(
        drain_events(&mut rx)
            .iter()
            .any(|e| matches!(e, PipelineEvent::Queued { .. }))
    );

    // Connectivity returns; the drain produces exactly one chapter+node
    // pair and an empty queue.
    h.monitor.set_connected(true);
    let report = h.pipeline.drain_queue().await.unwrap();
    assert_eq!(report.replayed, 1);
    assert_eq!(report.remaining, 0);
    assert_eq!(h.store.chapter_count().await, 1);
    assert_eq!(h.store.node_count().await, 1);
}

#[tokio::test]
async fn generation_failure_persists_nothing() {
    let h = harness(true);
    let mut rx = h.pipeline.subscribe();
    h.generator.push_steps(&[Step::ServerError]).await;

    let err = h
        .pipeline
        .generate_story(&entry("entry-1", "A rainy day"), "mystery", "u-1", "Sam")
        .await
        .unwrap_err();
    assert_eq!(err.category(), "network");

    assert_eq!(h.store.chapter_count().await, 0);
    assert_eq!(h.store.node_count().await, 0);
    assert!(h.queue.is_empty().await.unwrap());

    let events = drain_events(&mut rx);
    assert!(events.iter().any(
        |e| matches!(e, PipelineEvent::Failed { category, .. } if category == "network")
    ));
    assert_eq!(h.sink.reports.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn stale_monitor_still_takes_the_offline_branch() {
    // Monitor says online, but the extraction call hits a dead link.
    let h = harness(true);
    h.extractor.push_steps(&[Step::NotConnected]).await;

    let outcome = h
        .pipeline
        .generate_story(&entry("entry-1", "Field trip day"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();
    assert!(matches!(outcome, GenerationOutcome::Queued(_)));
    assert_eq!(h.queue.len().await.unwrap(), 1);
    assert_eq!(h.store.node_count().await, 0);
}

#[tokio::test]
async fn replay_is_fifo_and_threads_continuity() {
    let h = harness(false);

    for (id, text) in [("entry-1", "First day"), ("entry-2", "Second day")] {
        h.pipeline
            .generate_story(&entry(id, text), "fantasy", "u-1", "Sam")
            .await
            .unwrap();
    }
    assert_eq!(h.queue.len().await.unwrap(), 2);

    h.monitor.set_connected(true);
    let report = h.pipeline.drain_queue().await.unwrap();
    assert_eq!(report.replayed, 2);

    // FIFO: entry-1 became ch-1 and is the parent of entry-2's node.
    let nodes = h.store.all_story_nodes().await.unwrap();
    let first = nodes.iter().find(|n| n.journal_entry_id() == "entry-1").unwrap();
    let second = nodes.iter().find(|n| n.journal_entry_id() == "entry-2").unwrap();
    assert_eq!(first.parent_id(), &None);
    assert_eq!(second.parent_id(), &Some(first.chapter_id().clone()));

    // The second generation saw the first arc as continuity context.
    let prompts = h.generator.seen_prompts().await;
    assert_eq!(prompts[0].bounded_arcs().len(), 0);
    assert_eq!(prompts[1].bounded_arcs().len(), 1);
    assert_eq!(prompts[1].bounded_arcs()[0].chapter_id(), first.chapter_id());
}

#[tokio::test]
async fn drain_stops_when_connectivity_drops_again() {
    let h = harness(false);
    for id in ["entry-1", "entry-2"] {
        h.pipeline
            .generate_story(&entry(id, "text"), "fantasy", "u-1", "Sam")
            .await
            .unwrap();
    }

    h.monitor.set_connected(true);
    h.extractor.push_steps(&[Step::NotConnected]).await;

    let report = h.pipeline.drain_queue().await.unwrap();
    assert_eq!(report.replayed, 0);
    assert_eq!(report.remaining, 2);

    // Order preserved for the next drain, which now succeeds.
    let report = h.pipeline.drain_queue().await.unwrap();
    assert_eq!(report.replayed, 2);
    assert_eq!(report.remaining, 0);
}

#[tokio::test]
async fn replay_failures_surface_only_at_the_threshold() {
    let h = harness_with(false, 2);
    h.pipeline
        .generate_story(&entry("entry-1", "text"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();
    h.monitor.set_connected(true);

    // Decode failures leave the request queued but keep draining.
    h.generator.push_steps(&[Step::BadResponse]).await;
    h.pipeline.drain_queue().await.unwrap();
    assert_eq!(h.sink.reports.lock().unwrap().len(), 0);
    assert_eq!(h.queue.len().await.unwrap(), 1);

    h.generator.push_steps(&[Step::BadResponse]).await;
    h.pipeline.drain_queue().await.unwrap();
    assert_eq!(h.sink.reports.lock().unwrap().len(), 1);

    // Past the threshold: still queued, no repeat notification.
    h.generator.push_steps(&[Step::BadResponse]).await;
    h.pipeline.drain_queue().await.unwrap();
    assert_eq!(h.sink.reports.lock().unwrap().len(), 1);
    assert_eq!(h.queue.len().await.unwrap(), 1);
}

#[tokio::test]
async fn replay_worker_drains_on_the_reconnect_edge() {
    let h = harness(false);
    h.pipeline
        .generate_story(&entry("entry-1", "text"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();

    // The flip lands before the worker task gets its first poll; the
    // reconnect must still be observed as a change.
    let worker = h.pipeline.clone().run_replay_worker();
    h.monitor.set_connected(true);

    wait_for_empty_queue(&h).await;
    assert_eq!(h.store.node_count().await, 1);
    worker.abort();
}

#[tokio::test]
async fn replay_worker_handles_repeated_connectivity_cycles() {
    let h = harness(false);
    h.pipeline
        .generate_story(&entry("entry-1", "First"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();

    let worker = h.pipeline.clone().run_replay_worker();
    tokio::task::yield_now().await;

    h.monitor.set_connected(true);
    wait_for_empty_queue(&h).await;
    assert_eq!(h.store.node_count().await, 1);

    h.monitor.set_connected(false);
    h.pipeline
        .generate_story(&entry("entry-2", "Second"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();
    h.monitor.set_connected(true);
    wait_for_empty_queue(&h).await;
    assert_eq!(h.store.node_count().await, 2);
    worker.abort();
}

#[tokio::test]
async fn blank_entry_text_is_rejected_before_any_remote_call() {
    let h = harness(true);
    let mut rx = h.pipeline.subscribe();

    for content in ["", "   \n\t"] {
        let err = h
            .pipeline
            .generate_story(&entry("entry-1", content), "fantasy", "u-1", "Sam")
            .await
            .unwrap_err();
        assert_eq!(err.category(), "validation");
    }

    assert_eq!(h.extractor.call_count(), 0);
    assert!(h.queue.is_empty().await.unwrap());
    assert_eq!(h.store.chapter_count().await, 0);
    assert_eq!(h.store.node_count().await, 0);
    let events = drain_events(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(
        |e| matches!(e, PipelineEvent::Failed { category, .. } if category == "validation")
    ));
    assert_eq!(h.sink.reports.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn blank_entry_text_is_not_queued_while_offline() {
    let h = harness(false);
    let err = h
        .pipeline
        .generate_story(&entry("entry-1", "  "), "fantasy", "u-1", "Sam")
        .await
        .unwrap_err();
    assert_eq!(err.category(), "validation");
    assert!(h.queue.is_empty().await.unwrap());
}

#[tokio::test]
async fn corrupt_queued_payloads_are_dropped_not_retried() {
    let h = harness(false);

    // A request that lost its payload keys can never replay.
    let bad = OfflineRequest::new(OfflineRequestKind::GenerateStory, HashMap::new());
    h.queue.add_request(&bad).await.unwrap();
    h.pipeline
        .generate_story(&entry("entry-1", "text"), "fantasy", "u-1", "Sam")
        .await
        .unwrap();

    h.monitor.set_connected(true);
    let report = h.pipeline.drain_queue().await.unwrap();

    // The corrupt request is gone, the drain continued past it, and the
    // failure was surfaced exactly once.
    assert_eq!(report.replayed, 1);
    assert_eq!(report.remaining, 0);
    assert!(h.queue.is_empty().await.unwrap());
    assert_eq!(h.store.node_count().await, 1);
    assert_eq!(h.sink.reports.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_generations_chain_instead_of_forking() {
    let h = harness(true);

    let a = {
        let pipeline = h.pipeline.clone();
        tokio::spawn(async move {
            pipeline
                .generate_story(&entry("entry-a", "Morning"), "fantasy", "u-1", "Sam")
                .await
                .unwrap()
        })
    };
    let b = {
        let pipeline = h.pipeline.clone();
        tokio::spawn(async move {
            pipeline
                .generate_story(&entry("entry-b", "Evening"), "fantasy", "u-1", "Sam")
                .await
                .unwrap()
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    let nodes = h.store.all_story_nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);
    let roots: Vec<_> = nodes.iter().filter(|n| n.parent_id().is_none()).collect();
    assert_eq!(roots.len(), 1, "exactly one root, no sibling fork");
    let child = nodes.iter().find(|n| n.parent_id().is_some()).unwrap();
    assert_eq!(child.parent_id(), &Some(roots[0].chapter_id().clone()));
}
