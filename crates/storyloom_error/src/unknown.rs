//! Catch-all error type.

/// Catch-all for failures that fit no other category.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Unknown Error: {} at line {} in {}", message, line, file)]
pub struct UnknownError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl UnknownError {
    /// Create a new UnknownError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
