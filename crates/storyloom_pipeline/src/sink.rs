//! Tracing-backed error sink.

use storyloom_error::StoryloomError;
use storyloom_interface::ErrorSink;

/// Error sink that logs terminal failures at `error!` level.
///
/// The application shell can substitute its own sink to route failures
/// into user-facing notifications.
#[derive(Debug, Clone, Default)]
pub struct TracingErrorSink;

impl TracingErrorSink {
    /// Create a sink.
    pub fn new() -> Self {
        Self
    }
}

impl ErrorSink for TracingErrorSink {
    fn report(&self, context: &str, error: &StoryloomError) {
        tracing::error!(
            context = %context,
            category = %error.category(),
            error = %error,
            "Terminal pipeline failure"
        );
    }
}
