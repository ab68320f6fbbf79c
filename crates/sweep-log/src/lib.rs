//! Pipe-delimited, size-rotated log file wired into `tracing`.

pub mod file;
pub mod layer;
pub mod line;
pub mod settings;

pub use file::*;
pub use layer::*;
pub use line::*;
pub use settings::*;

use thiserror::Error;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("prepare log file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("install subscriber: {0}")]
    Subscriber(String),
}

/// Rotate the log if needed, then install the global subscriber.
///
/// Must run before anything else logs. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(settings: &LogSettings) -> Result<LogFile, LogInitError> {
    let file = LogFile::new(settings.clone());
    file.initialize().map_err(|source| LogInitError::Io {
        path: settings.path.display().to_string(),
        source,
    })?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(LogFileLayer::new(file.clone()).with_stdout(settings.echo_stdout))
        .try_init()
        .map_err(|e| LogInitError::Subscriber(e.to_string()))?;
    Ok(file)
}
