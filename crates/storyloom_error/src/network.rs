//! Network error types for the remote extraction and generation calls.

/// Specific error conditions for remote calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NetworkErrorKind {
    /// No connectivity at the transport level. Triggers the offline branch
    /// rather than a hard failure.
    #[display("No network connection")]
    NotConnected,
    /// The request timed out
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// The server returned a non-2xx status
    #[display("Server returned status {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },
    /// Any other transport-level failure
    #[display("Transport error: {}", _0)]
    Transport(String),
}

/// Error type for remote call failures.
///
/// # Examples
///
/// ```
/// use storyloom_error::{NetworkError, NetworkErrorKind};
///
/// let err = NetworkError::new(NetworkErrorKind::NotConnected);
/// assert!(err.is_not_connected());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Network Error: {} at line {} in {}", kind, line, file)]
pub struct NetworkError {
    /// The specific error condition
    pub kind: NetworkErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NetworkError {
    /// Create a new NetworkError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NetworkErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error represents missing connectivity.
    pub fn is_not_connected(&self) -> bool {
        matches!(self.kind, NetworkErrorKind::NotConnected)
    }
}
