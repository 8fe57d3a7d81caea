//! Core data structures for tabular-to-columnar dataset conversion
//!
//! This crate defines the in-memory [`Table`] every source reader produces and
//! every sink writer consumes, the row-object form some sources yield together
//! with the pivot back to columns, and the name-only schema derived for
//! columnar sinks.

#![warn(missing_docs)]

pub mod error;
pub mod row;
pub mod schema;
pub mod table;

// Re-export key types for convenience
pub use error::{Error, Result};
pub use row::{pivot_rows, pivot_rows_with_columns, Row};
pub use schema::{column_sources, derive_schema, ColumnSource, SchemaElement};
pub use table::{Column, DataType, Table, Value};
