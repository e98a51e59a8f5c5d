//! Durable storage for the Storyloom story graph and offline queue.
//!
//! Both durable stores follow the same discipline: full in-memory state,
//! mutated under a writer lock, persisted as one JSON snapshot written to a
//! temp file and atomically renamed into place. A chapter+node append is
//! therefore one logical transaction; there is no orphaned-chapter state to
//! reconcile. Snapshots are small and written synchronously under the
//! lock; a failed write surfaces as a persistence error, and the next
//! successful write rewrites the whole snapshot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod graph;
mod memory;
mod queue;
mod snapshot;
mod store;

pub use graph::StoryGraph;
pub use memory::{InMemoryOfflineQueue, InMemoryStoryStore};
pub use queue::JsonOfflineQueue;
pub use store::JsonStoryStore;
