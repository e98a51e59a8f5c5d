//! Top-level error wrapper types.

use crate::{
    ConfigError, DecodeError, IntegrityError, NetworkError, PersistenceError, UnknownError,
    ValidationError,
};

/// Discriminated union over every Storyloom error category.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomError, NetworkError, NetworkErrorKind};
///
/// let net_err = NetworkError::new(NetworkErrorKind::NotConnected);
/// let err: StoryloomError = net_err.into();
/// assert!(format!("{}", err).contains("Network Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Remote call failure (connectivity, timeout, non-2xx)
    #[from(NetworkError)]
    Network(NetworkError),
    /// Malformed remote response
    #[from(DecodeError)]
    Decode(DecodeError),
    /// Story-graph integrity violation
    #[from(IntegrityError)]
    Integrity(IntegrityError),
    /// Local storage failure
    #[from(PersistenceError)]
    Persistence(PersistenceError),
    /// Configuration read or parse failure
    #[from(ConfigError)]
    Config(ConfigError),
    /// Rejected caller input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Anything else
    #[from(UnknownError)]
    Unknown(UnknownError),
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomResult, UnknownError};
///
/// fn might_fail() -> StoryloomResult<()> {
///     Err(UnknownError::new("something odd"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }

    /// Whether this is the not-connected network case that triggers the
    /// offline branch.
    pub fn is_not_connected(&self) -> bool {
        matches!(self.kind(), StoryloomErrorKind::Network(e) if e.is_not_connected())
    }

    /// Whether this is any network-class failure.
    pub fn is_network(&self) -> bool {
        matches!(self.kind(), StoryloomErrorKind::Network(_))
    }

    /// Short stable label for user-facing messaging (network vs. storage
    /// vs. unknown).
    pub fn category(&self) -> &'static str {
        match self.kind() {
            StoryloomErrorKind::Network(_) => "network",
            StoryloomErrorKind::Decode(_) => "decode",
            StoryloomErrorKind::Integrity(_) => "integrity",
            StoryloomErrorKind::Persistence(_) => "storage",
            StoryloomErrorKind::Config(_) => "config",
            StoryloomErrorKind::Validation(_) => "validation",
            StoryloomErrorKind::Unknown(_) => "unknown",
        }
    }
}

// Generic From implementation for any type that converts to StoryloomErrorKind
impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
