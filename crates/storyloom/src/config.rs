//! Application configuration and wiring.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyloom_clients::{
    ClientConfig, HttpChapterGenerator, HttpMetadataExtractor, STORYLOOM_API_KEY_ENV,
};
use storyloom_error::{ConfigError, StoryloomError, StoryloomResult};
use storyloom_pipeline::{REPLAY_SURFACE_THRESHOLD, StoryPipeline, WatchConnectivityMonitor};
use storyloom_storage::{JsonOfflineQueue, JsonStoryStore};

/// Configuration for a Storyloom deployment.
///
/// The API key is never part of the file; the file names the environment
/// variable that holds it, resolved at wiring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryloomConfig {
    /// Remote endpoint configuration
    pub api: ApiConfig,
    /// Local storage configuration
    pub storage: StorageConfig,
    /// Pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Configuration for the extraction and generation clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint base URL, no trailing slash
    pub base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Configuration for the JSON-snapshot stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the story graph and offline queue snapshots
    pub data_dir: PathBuf,
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Failed replay attempts before a request is surfaced to the error
    /// sink
    #[serde(default = "default_replay_surface_threshold")]
    pub replay_surface_threshold: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            replay_surface_threshold: REPLAY_SURFACE_THRESHOLD,
        }
    }
}

fn default_api_key_env() -> String {
    STORYLOOM_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_replay_surface_threshold() -> u32 {
    REPLAY_SURFACE_THRESHOLD
}

impl StoryloomConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StoryloomError::from(ConfigError::new(format!(
                "Failed to read config file: {}",
                e
            )))
        })?;

        toml::from_str(&content).map_err(|e| {
            StoryloomError::from(ConfigError::new(format!("Failed to parse config: {}", e)))
        })
    }

    /// Wire the production pipeline: HTTP clients against the configured
    /// endpoint, JSON-snapshot stores under the data directory, and a
    /// watch-channel connectivity monitor driven by the application shell.
    pub fn wire(&self) -> StoryloomResult<StoryloomApp> {
        let api_key = std::env::var(&self.api.api_key_env).map_err(|e| {
            ConfigError::new(format!("{} not set: {}", self.api.api_key_env, e))
        })?;
        let client_config = ClientConfig::builder()
            .base_url(self.api.base_url.clone())
            .api_key(api_key)
            .timeout_secs(self.api.timeout_secs)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid client configuration: {}", e)))?;

        let extractor = Arc::new(HttpMetadataExtractor::new(client_config.clone())?);
        let generator = Arc::new(HttpChapterGenerator::new(client_config)?);
        let repository = Arc::new(JsonStoryStore::open(&self.storage.data_dir)?);
        let queue = Arc::new(JsonOfflineQueue::open(&self.storage.data_dir)?);
        let monitor = Arc::new(WatchConnectivityMonitor::default());

        let pipeline =
            StoryPipeline::builder(extractor, generator, repository, queue, monitor.clone())
                .with_replay_surface_threshold(self.pipeline.replay_surface_threshold)
                .build();

        Ok(StoryloomApp { pipeline, monitor })
    }
}

/// A fully wired pipeline plus the connectivity monitor that drives it.
#[derive(Clone)]
pub struct StoryloomApp {
    pipeline: Arc<StoryPipeline>,
    monitor: Arc<WatchConnectivityMonitor>,
}

impl StoryloomApp {
    /// The wired pipeline.
    pub fn pipeline(&self) -> &Arc<StoryPipeline> {
        &self.pipeline
    }

    /// The connectivity monitor. The application shell publishes
    /// reachability changes here.
    pub fn monitor(&self) -> &Arc<WatchConnectivityMonitor> {
        &self.monitor
    }

    /// Spawn the background worker that replays the offline queue on every
    /// reconnect.
    pub fn start_replay_worker(&self) -> tokio::task::JoinHandle<()> {
        self.pipeline.clone().run_replay_worker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_with_defaults() {
        let config: StoryloomConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"

            [storage]
            data_dir = "/var/lib/storyloom"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.api_key_env, "STORYLOOM_API_KEY");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.pipeline.replay_surface_threshold, 3);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/storyloom"));
    }

    #[test]
    fn overrides_are_honored() {
        let config: StoryloomConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"
            api_key_env = "MY_KEY"
            timeout_secs = 5

            [storage]
            data_dir = "data"

            [pipeline]
            replay_surface_threshold = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.api.api_key_env, "MY_KEY");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.pipeline.replay_surface_threshold, 1);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = StoryloomConfig::from_file("/nonexistent/storyloom.toml").unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = std::env::temp_dir().join(format!("storyloom_config_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storyloom.toml");
        std::fs::write(&path, "api = 7").unwrap();
        let err = StoryloomConfig::from_file(&path).unwrap_err();
        assert_eq!(err.category(), "config");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
