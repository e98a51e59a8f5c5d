//! Snapshot persistence shared by the durable stores.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use storyloom_error::{PersistenceError, PersistenceErrorKind, StoryloomResult};
use tracing::debug;

/// Load a snapshot, returning the default when the file does not exist yet.
pub(crate) fn load_or_default<T>(path: &Path) -> StoryloomResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        debug!(path = %path.display(), "No snapshot file, starting empty");
        return Ok(T::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Read(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Serialization(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}

/// Write a snapshot via temp file + rename so a crash never leaves a
/// half-written file and multi-record commits land atomically.
pub(crate) fn persist<T>(path: &Path, state: &T) -> StoryloomResult<()>
where
    T: Serialize,
{
    let contents = serde_json::to_string_pretty(state).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Serialization(e.to_string()))
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Write(format!(
            "{}: {}",
            tmp.display(),
            e
        )))
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Write(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    debug!(path = %path.display(), "Persisted snapshot");
    Ok(())
}

/// Ensure the store directory exists.
pub(crate) fn ensure_dir(dir: &Path) -> StoryloomResult<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Directory(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
    }
    Ok(())
}
