//! Process-level telemetry setup.

/// Initialize tracing for the process.
///
/// Loads a `.env` file if present, then installs the fmt subscriber with
/// `RUST_LOG` filtering, defaulting to `info`. Call once at startup.
pub fn init_telemetry() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
