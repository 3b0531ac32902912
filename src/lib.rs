pub mod config;
pub mod error;
pub mod models;
pub mod data;
pub mod preprocessing;
pub mod algorithms;
pub mod services;
pub mod pipeline;
pub mod utils;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use models::*;
pub use pipeline::{Pipeline, PipelineReport};

use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout is reserved for the metrics and prediction lines.
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
