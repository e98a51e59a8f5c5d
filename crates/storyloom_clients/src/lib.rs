//! HTTP clients for the two Storyloom remote endpoints.
//!
//! Both clients are thin: one POST, a status check, a typed decode, and
//! error mapping into the Storyloom taxonomy. Neither retries; retry
//! policy belongs to the orchestrator and the offline queue.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod extraction;
mod generation;
mod http;

pub use config::{ClientConfig, ClientConfigBuilder, STORYLOOM_API_KEY_ENV};
pub use extraction::HttpMetadataExtractor;
pub use generation::HttpChapterGenerator;
