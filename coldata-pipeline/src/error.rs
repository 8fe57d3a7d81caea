//! Error types for conversion jobs

use std::path::PathBuf;

use thiserror::Error;

/// Error type for conversion jobs
#[derive(Error, Debug)]
pub enum Error {
    /// Reader or writer failure
    #[error(transparent)]
    Reader(#[from] coldata_readers::Error),

    /// A job's format could not be determined from its path
    #[error("Cannot determine {kind} format of '{}'", .path.display())]
    UnknownFormat {
        /// "source" or "sink"
        kind: &'static str,
        /// Path whose extension was inspected
        path: PathBuf,
    },

    /// Invalid job configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A conversion task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for conversion jobs
pub type Result<T> = std::result::Result<T, Error>;
