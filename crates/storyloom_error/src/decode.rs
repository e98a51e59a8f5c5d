//! Decode error for malformed remote responses.

/// Error raised when a remote response cannot be decoded into the expected
/// wire shape.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Decode Error: {} at line {} in {}", message, line, file)]
pub struct DecodeError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DecodeError {
    /// Create a new DecodeError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom_error::DecodeError;
    ///
    /// let err = DecodeError::new("missing field `chapterId`");
    /// assert!(err.message.contains("chapterId"));
    /// ```
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
