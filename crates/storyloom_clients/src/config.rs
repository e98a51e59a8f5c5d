//! Client configuration.

use storyloom_error::{StoryloomResult, UnknownError};

/// Environment variable holding the API key for both endpoints.
pub const STORYLOOM_API_KEY_ENV: &str = "STORYLOOM_API_KEY";

/// Shared configuration for the extraction and generation clients.
///
/// # Examples
///
/// ```
/// use storyloom_clients::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.example.com")
///     .api_key("secret")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "https://api.example.com");
/// ```
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ClientConfig {
    /// Endpoint base URL, no trailing slash
    base_url: String,
    /// Bearer token for both endpoints
    api_key: String,
    /// Request timeout in seconds
    #[builder(default = "30")]
    timeout_secs: u64,
}

impl ClientConfig {
    /// Builder for a client configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a configuration with the API key taken from
    /// [`STORYLOOM_API_KEY_ENV`].
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(base_url: impl Into<String>) -> StoryloomResult<Self> {
        let api_key = std::env::var(STORYLOOM_API_KEY_ENV).map_err(|e| {
            UnknownError::new(format!("{} not set: {}", STORYLOOM_API_KEY_ENV, e))
        })?;
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            timeout_secs: 30,
        })
    }
}
