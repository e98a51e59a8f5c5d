//! Integrity errors for the story graph.

/// Specific integrity violations in the story graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum IntegrityErrorKind {
    /// A node references a chapter id with no saved chapter
    #[display("Node references missing chapter '{}'", _0)]
    MissingChapter(String),
    /// A node's parent id references a chapter that does not exist
    #[display("Node parent '{}' references a chapter that does not exist", _0)]
    DanglingParent(String),
    /// A journal entry already has a node; nodes are created exactly once
    #[display("Journal entry '{}' already has a story node", _0)]
    DuplicateNode(String),
}

/// Error type for story-graph integrity violations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{IntegrityError, IntegrityErrorKind};
///
/// let err = IntegrityError::new(IntegrityErrorKind::MissingChapter("ch-9".into()));
/// assert!(format!("{}", err).contains("ch-9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Integrity Error: {} at line {} in {}", kind, line, file)]
pub struct IntegrityError {
    /// The specific violation
    pub kind: IntegrityErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl IntegrityError {
    /// Create a new IntegrityError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: IntegrityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
