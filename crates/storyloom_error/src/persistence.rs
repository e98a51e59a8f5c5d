//! Persistence error types for the local story store and offline queue.

/// Specific error conditions for local storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PersistenceErrorKind {
    /// Failed to read a snapshot file
    #[display("Failed to read store file: {}", _0)]
    Read(String),
    /// Failed to write a snapshot file
    #[display("Failed to write store file: {}", _0)]
    Write(String),
    /// Persisted state failed to serialize or deserialize
    #[display("Store serialization failed: {}", _0)]
    Serialization(String),
    /// The store directory could not be created
    #[display("Failed to create store directory: {}", _0)]
    Directory(String),
}

/// Error type for local storage failures.
///
/// Persistence failures are surfaced, never silently dropped, and never
/// retried automatically: retrying the same write is unlikely to succeed
/// without user or system intervention.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Persistence Error: {} at line {} in {}", kind, line, file)]
pub struct PersistenceError {
    /// The specific error condition
    pub kind: PersistenceErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PersistenceError {
    /// Create a new PersistenceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersistenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
