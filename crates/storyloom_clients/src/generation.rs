//! Chapter generation client.

use crate::{ClientConfig, http};
use async_trait::async_trait;
use storyloom_core::{ChapterGenerationRequest, ChapterPrompt, ChapterResponse, GeneratedChapter};
use storyloom_error::StoryloomResult;
use storyloom_interface::ChapterGenerator;
use tracing::instrument;

const GENERATE_PATH: &str = "/chapter/generate";

/// HTTP client for the chapter generation endpoint.
///
/// The continuity window is capped at
/// [`MAX_PREVIOUS_ARCS`](storyloom_core::MAX_PREVIOUS_ARCS); the wire
/// conversion truncates even if the caller passed more.
#[derive(Debug, Clone)]
pub struct HttpChapterGenerator {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpChapterGenerator {
    /// Creates a new generation client.
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
impl ChapterGenerator for HttpChapterGenerator {
    #[instrument(skip(self, prompt), fields(genre = %prompt.genre(), arc_count = prompt.bounded_arcs().len()))]
    async fn generate_chapter(&self, prompt: &ChapterPrompt) -> StoryloomResult<GeneratedChapter> {
        let request = ChapterGenerationRequest::from(prompt);
        let response: ChapterResponse =
            http::post_json(&self.client, &self.config, GENERATE_PATH, &request).await?;

        tracing::debug!(
            chapter_id = %response.chapter_id,
            text_len = response.text.len(),
            "Generated chapter"
        );
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_error::StoryloomErrorKind;

    // Unroutable per RFC 5737; connect errors must surface as the
    // not-connected network case so the pipeline can take the offline
    // branch even when the monitor thought we were online.
    #[tokio::test]
    async fn unreachable_host_maps_to_a_network_error() {
        let config = ClientConfig::builder()
            .base_url("http://192.0.2.1:9")
            .api_key("test")
            .timeout_secs(1u64)
            .build()
            .unwrap();
        let client = HttpChapterGenerator::new(config).unwrap();

        let prompt = ChapterPrompt::builder()
            .metadata(storyloom_core::StoryMetadata::new(
                "neutral",
                vec![],
                vec![],
                vec![],
            ))
            .user_id("u")
            .genre("fantasy")
            .student_name("Sam")
            .build()
            .unwrap();

        let err = client.generate_chapter(&prompt).await.unwrap_err();
        assert!(matches!(err.kind(), StoryloomErrorKind::Network(_)));
    }
}
