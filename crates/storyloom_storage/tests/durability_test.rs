//! Durability tests: a second instance opened on the same directory must
//! see everything the first one persisted.

use chrono::{Duration, Utc};
use storyloom_core::{GenerateStoryPayload, NewStoryNode, StoryChapter, StoryMetadata};
use storyloom_interface::{OfflineQueue, StoryRepository};
use storyloom_storage::{JsonOfflineQueue, JsonStoryStore};

fn temp_dir(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("storyloom_{}_{}", label, uuid::Uuid::new_v4()))
}

fn metadata() -> StoryMetadata {
    StoryMetadata::new("positive", vec!["learning".into()], vec![], vec![])
}

#[tokio::test]
async fn story_graph_survives_reopen() {
    let dir = temp_dir("store");

    {
        let store = JsonStoryStore::open(&dir).unwrap();
        let t0 = Utc::now();
        for (i, id) in ["ch-1", "ch-2"].iter().enumerate() {
            let entry = format!("entry-{}", i + 1);
            let chapter = StoryChapter::new(*id, "text", "hook", &entry, t0);
            let node = NewStoryNode::new(&entry, metadata(), t0 + Duration::seconds(i as i64));
            store.append_story(&chapter, &node).await.unwrap();
        }
    }

    let reopened = JsonStoryStore::open(&dir).unwrap();
    let nodes = reopened.all_story_nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);

    let arcs = reopened.previous_story_arcs(1).await.unwrap();
    assert_eq!(arcs[0].chapter_id(), "ch-2");

    let chapter = reopened.get_chapter("ch-1").await.unwrap().unwrap();
    assert_eq!(chapter.text(), "text");

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn parent_chain_is_rebuilt_from_disk() {
    let dir = temp_dir("chain");
    let t0 = Utc::now();

    {
        let store = JsonStoryStore::open(&dir).unwrap();
        store
            .append_story(
                &StoryChapter::new("ch-1", "a", "hook", "entry-1", t0),
                &NewStoryNode::new("entry-1", metadata(), t0),
            )
            .await
            .unwrap();
    }

    // New instance appends; the parent must come from the persisted node.
    let store = JsonStoryStore::open(&dir).unwrap();
    let node = store
        .append_story(
            &StoryChapter::new("ch-2", "b", "hook", "entry-2", t0),
            &NewStoryNode::new("entry-2", metadata(), t0 + Duration::seconds(5)),
        )
        .await
        .unwrap();
    assert_eq!(node.parent_id(), &Some("ch-1".to_string()));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn failed_persist_surfaces_and_the_next_snapshot_heals() {
    let dir = temp_dir("persistfail");
    let store = JsonStoryStore::open(&dir).unwrap();
    let t0 = Utc::now();

    // A directory squatting on the temp-file path makes the write fail.
    let blocker = dir.join("story_graph.json.tmp");
    std::fs::create_dir_all(&blocker).unwrap();
    let err = store
        .append_story(
            &StoryChapter::new("ch-1", "a", "hook", "entry-1", t0),
            &NewStoryNode::new("entry-1", metadata(), t0),
        )
        .await
        .unwrap_err();
    assert_eq!(err.category(), "storage");

    // The mutation stayed in memory; once writes succeed again the full
    // snapshot carries it to disk.
    assert_eq!(store.all_story_nodes().await.unwrap().len(), 1);
    std::fs::remove_dir(&blocker).unwrap();
    store
        .append_story(
            &StoryChapter::new("ch-2", "b", "hook", "entry-2", t0 + Duration::seconds(1)),
            &NewStoryNode::new("entry-2", metadata(), t0 + Duration::seconds(1)),
        )
        .await
        .unwrap();

    let reopened = JsonStoryStore::open(&dir).unwrap();
    assert_eq!(reopened.all_story_nodes().await.unwrap().len(), 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn queue_survives_reopen_in_fifo_order() {
    let dir = temp_dir("queue");

    let first = GenerateStoryPayload::new("e-1", "text one", "fantasy", "u", "Sam").into_request();
    let second = GenerateStoryPayload::new("e-2", "text two", "mystery", "u", "Sam").into_request();

    {
        let queue = JsonOfflineQueue::open(&dir).unwrap();
        queue.add_request(&first).await.unwrap();
        queue.add_request(&second).await.unwrap();
    }

    let reopened = JsonOfflineQueue::open(&dir).unwrap();
    let pending = reopened.pending_requests().await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id(), first.id());
    assert_eq!(pending[1].id(), second.id());

    reopened.remove_request(first.id()).await.unwrap();
    assert_eq!(reopened.len().await.unwrap(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn attempt_counts_are_persisted() {
    let dir = temp_dir("attempts");
    let request = GenerateStoryPayload::new("e-1", "text", "fantasy", "u", "Sam").into_request();

    {
        let queue = JsonOfflineQueue::open(&dir).unwrap();
        queue.add_request(&request).await.unwrap();
        assert_eq!(queue.record_attempt(request.id()).await.unwrap(), 1);
        assert_eq!(queue.record_attempt(request.id()).await.unwrap(), 2);
    }

    let reopened = JsonOfflineQueue::open(&dir).unwrap();
    let pending = reopened.pending_requests().await.unwrap();
    assert_eq!(*pending[0].attempts(), 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn removing_a_missing_request_is_an_error() {
    let dir = temp_dir("missing");
    let queue = JsonOfflineQueue::open(&dir).unwrap();
    let err = queue.remove_request(&uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.category(), "unknown");
    std::fs::remove_dir_all(&dir).ok();
}
