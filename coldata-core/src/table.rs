//! Columnar table: named, ordered columns of equal length
//!
//! A [`Table`] is produced once by a source reader, is read-only afterwards and
//! is consumed by a sink writer. Every column carries a single [`DataType`] and
//! a value sequence whose length equals the table's row count.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::row::Row;

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Every value is null
    Null,

    /// `true` / `false`
    Boolean,

    /// 64-bit signed integer
    Int64,

    /// 64-bit floating point
    Float64,

    /// UTF-8 encoded string
    Utf8,
}

impl DataType {
    /// Smallest type able to hold values of both `self` and `other`.
    ///
    /// Null gives way to anything, integers promote to floats, and any other
    /// mix of kinds falls back to strings.
    pub fn unify(self, other: DataType) -> DataType {
        match (self, other) {
            (a, b) if a == b => a,
            (DataType::Null, t) | (t, DataType::Null) => t,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            _ => DataType::Utf8,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Utf8 => "utf8",
        };
        f.write_str(name)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Int64(i64),
    /// Floating point value
    Float64(f64),
    /// String value
    Utf8(String),
}

impl Value {
    /// Type of this value (`Null` for [`Value::Null`])
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Utf8(_) => DataType::Utf8,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert this value to `target`, which must be a type produced by
    /// [`DataType::unify`] with this value's type.
    #[allow(clippy::cast_precision_loss)]
    pub fn coerce(self, target: DataType) -> Value {
        match (self, target) {
            (Value::Null, _) => Value::Null,
            (Value::Int64(v), DataType::Float64) => Value::Float64(v as f64),
            (Value::Utf8(s), DataType::Utf8) => Value::Utf8(s),
            (v, DataType::Utf8) => Value::Utf8(v.to_string()),
            (v, _) => v,
        }
    }

    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload as a float, if any
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean payload, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A named column holding values of a single type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Name of the column
    name: String,

    /// Data type of every non-null value
    data_type: DataType,

    /// Values in row order
    values: Vec<Value>,
}

impl Column {
    /// Create a column, checking that every non-null value has `data_type`
    pub fn try_new(
        name: impl Into<String>,
        data_type: DataType,
        values: Vec<Value>,
    ) -> Result<Self> {
        let name = name.into();
        for (row, value) in values.iter().enumerate() {
            let actual = value.data_type();
            if actual != DataType::Null && actual != data_type {
                return Err(Error::TypeMismatch {
                    column: name,
                    expected: data_type,
                    actual,
                    row,
                });
            }
        }

        Ok(Self {
            name,
            data_type,
            values,
        })
    }

    /// Create a column whose type is unified from its values.
    ///
    /// Values are coerced to the unified type, so this never fails.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let data_type = values
            .iter()
            .fold(DataType::Null, |acc, v| acc.unify(v.data_type()));

        let needs_coercion = values
            .iter()
            .any(|v| !v.is_null() && v.data_type() != data_type);

        let values = if needs_coercion {
            values.into_iter().map(|v| v.coerce(data_type)).collect()
        } else {
            values
        };

        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    /// Create a column of `len` nulls
    pub fn nulls(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Null,
            values: vec![Value::Null; len],
        }
    }

    /// Get the name of this column
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the data type of this column
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Get the values of this column
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get the length of this column (number of values)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if this column is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the number of null values in this column
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// An in-memory columnar table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Columns in source order
    columns: Vec<Column>,

    /// Row count shared by every column
    num_rows: usize,
}

impl Table {
    /// Create a table from columns.
    ///
    /// Column names must be unique and all columns must have the same length.
    /// A table without columns has zero rows.
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);
        Self::with_row_count(columns, num_rows)
    }

    /// Create a table with an explicit row count.
    ///
    /// Needed for sources that declare rows but carry no columns.
    pub fn with_row_count(columns: Vec<Column>, num_rows: usize) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(Error::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != num_rows {
                return Err(Error::LengthMismatch {
                    column: column.name().to_string(),
                    expected: num_rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, num_rows })
    }

    /// Create a zero-row table with the given column names
    pub fn empty<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names.into_iter().map(|name| Column::nulls(name, 0)).collect();
        Self::with_row_count(columns, 0)
    }

    /// Get the number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Get the number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Get all columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Get a column by position
    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Build the row object at `index`
    pub fn row(&self, index: usize) -> Option<Row> {
        if index >= self.num_rows {
            return None;
        }

        Some(
            self.columns
                .iter()
                .map(|c| (c.name().to_string(), c.values()[index].clone()))
                .collect(),
        )
    }

    /// Iterate over row objects in order
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.num_rows).filter_map(move |i| self.row(i))
    }
}
