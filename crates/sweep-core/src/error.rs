use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Missing or invalid configuration. Always fatal, raised before any scanning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("rule {index}: invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        message: String,
    },

    #[error("credential could not be decoded: {0}")]
    Credential(String),
}

/// The scan root could not be enumerated. The whole pass is discarded.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root path does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("root path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("enumerate {}: {source}", .path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single file could not be removed. Counted and logged; the pass continues.
#[derive(Debug, Error)]
#[error("delete {}: {source}", .path.display())]
pub struct DeleteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
