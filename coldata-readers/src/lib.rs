//! Source readers and sink writers for columnar dataset preparation
//!
//! This crate decodes CSV, compressed Arrow IPC and Parquet files into a
//! [`Table`] and encodes tables back into compressed Parquet and Arrow files.

mod error;

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "arrow")]
pub mod arrow;

#[cfg(feature = "parquet")]
pub mod parquet;

pub mod common;

pub use common::{FileFormat, SinkFormat, SourceFormat};
pub use error::{Error, Result};

// Re-export core types
pub use coldata_core::{Column, DataType, Row, SchemaElement, Table, Value};
