//! Metadata extraction client.

use crate::{ClientConfig, http};
use async_trait::async_trait;
use storyloom_core::{MetadataRequest, MetadataResponse, StoryMetadata};
use storyloom_error::StoryloomResult;
use storyloom_interface::MetadataExtractor;
use tracing::instrument;

const EXTRACT_PATH: &str = "/metadata/extract";

/// HTTP client for the metadata extraction endpoint.
#[derive(Debug, Clone)]
pub struct HttpMetadataExtractor {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpMetadataExtractor {
    /// Creates a new extraction client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all)]
    pub fn new(config: ClientConfig) -> StoryloomResult<Self> {
        let client = http::build_client(&config)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MetadataExtractor for HttpMetadataExtractor {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn extract_metadata(&self, text: &str) -> StoryloomResult<StoryMetadata> {
        let request = MetadataRequest {
            text: text.to_string(),
        };
        let response: MetadataResponse =
            http::post_json(&self.client, &self.config, EXTRACT_PATH, &request).await?;

        tracing::debug!(
            sentiment = %response.sentiment,
            theme_count = response.themes.len(),
            "Extracted metadata"
        );
        Ok(response.into())
    }
}
