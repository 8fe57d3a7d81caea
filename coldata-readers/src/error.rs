//! Error types for source readers and sink writers

use thiserror::Error;

/// Error type for source readers and sink writers
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] coldata_core::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV format error
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Arrow encoding or decoding error
    #[cfg(feature = "arrow")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet format error
    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Byte compressor failure
    #[error("Compression error: {0}")]
    Compression(String),

    /// Column chunk compressed with a codec missing from the registry
    #[error("Unsupported codec {codec} in column '{column}'")]
    UnsupportedCodec {
        /// Codec name
        codec: String,
        /// Column path of the chunk
        column: String,
    },

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Format error
    #[error("Format error: {0}")]
    Format(String),

    /// Unsupported operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type for source readers and sink writers
pub type Result<T> = std::result::Result<T, Error>;
