//! Durable JSON-snapshot implementation of the offline queue.

use crate::snapshot;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyloom_core::OfflineRequest;
use storyloom_error::{StoryloomResult, UnknownError};
use storyloom_interface::OfflineQueue;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

const QUEUE_FILE: &str = "offline_queue.json";

/// File-backed offline request queue.
///
/// Requests live in a `Vec` in enqueue order; the vector order is the FIFO
/// contract. Every mutation rewrites the snapshot before returning, so an
/// enqueued request survives a crash and a removed request never comes
/// back.
#[derive(Debug, Clone)]
pub struct JsonOfflineQueue {
    path: PathBuf,
    requests: Arc<RwLock<Vec<OfflineRequest>>>,
}

impl JsonOfflineQueue {
    /// Open (or create) a queue under the given directory.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the directory cannot be created or
    /// an existing snapshot cannot be read.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> StoryloomResult<Self> {
        let dir = dir.as_ref();
        snapshot::ensure_dir(dir)?;
        let path = dir.join(QUEUE_FILE);
        let requests: Vec<OfflineRequest> = snapshot::load_or_default(&path)?;
        debug!(pending = requests.len(), "Loaded offline queue");
        Ok(Self {
            path,
            requests: Arc::new(RwLock::new(requests)),
        })
    }
}

#[async_trait]
impl OfflineQueue for JsonOfflineQueue {
    async fn add_request(&self, request: &OfflineRequest) -> StoryloomResult<()> {
        let mut requests = self.requests.write().await;
        requests.push(request.clone());
        snapshot::persist(&self.path, &*requests)?;
        info!(
            request_id = %request.id(),
            kind = %request.kind(),
            pending = requests.len(),
            "Queued offline request"
        );
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
        snapshot::persist(&self.path, &*requests)?;
        debug!(request_id = %id, pending = requests.len(), "Removed replayed request");
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
        let attempts = *request.attempts();
        snapshot::persist(&self.path, &*requests)?;
        Ok(attempts)
    }

    async fn len(&self) -> StoryloomResult<usize> {
        Ok(self.requests.read().await.len())
    }
}
