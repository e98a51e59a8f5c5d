//! Error types for the Storyloom narrative pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The `NetworkErrorKind::NotConnected` case is load-bearing: the pipeline
//! uses it to take the offline branch instead of failing the run.
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{StoryloomResult, DecodeError};
//!
//! fn parse_response() -> StoryloomResult<String> {
//!     Err(DecodeError::new("unexpected end of JSON input"))?
//! }
//!
//! match parse_response() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod decode;
mod error;
mod integrity;
mod network;
mod persistence;
mod unknown;
mod validation;

pub use config::ConfigError;
pub use decode::DecodeError;
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use integrity::{IntegrityError, IntegrityErrorKind};
pub use network::{NetworkError, NetworkErrorKind};
pub use persistence::{PersistenceError, PersistenceErrorKind};
pub use unknown::UnknownError;
pub use validation::ValidationError;
