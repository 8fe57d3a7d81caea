//! Error types for the columnar table model

use thiserror::Error;

use crate::table::DataType;

/// Result type for columnar table operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for columnar table operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Columns of one table have different lengths
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column
        column: String,
        /// Row count of the table
        expected: usize,
        /// Row count of the column
        actual: usize,
    },

    /// A value does not match the type of its column
    #[error("Column '{column}' is {expected:?} but row {row} holds {actual:?}")]
    TypeMismatch {
        /// Offending column
        column: String,
        /// Declared column type
        expected: DataType,
        /// Type of the stored value
        actual: DataType,
        /// Row index of the value
        row: usize,
    },

    /// A named column does not exist
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Row fields do not agree with the declared columns
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}
