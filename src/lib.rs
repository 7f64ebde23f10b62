pub mod error;
pub mod config;
pub mod models;
pub mod fetcher;
pub mod core;
pub mod analysis;
pub mod trackers;
pub mod commands;

use tracing_subscriber::EnvFilter;

/// Logs to stderr so stdout stays clean for `--json`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
