//! Row objects and the rows-to-columns pivot
//!
//! Some sources (Parquet) hand out row-shaped records. Everything downstream
//! works on [`Table`], so row-oriented data goes through [`pivot_rows`] or
//! [`pivot_rows_with_columns`] before reaching a sink.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::table::{Column, Table, Value};

/// A row record: field names mapped to values, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing value of the same name
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Pivot row records into a table.
///
/// The column set is the union of field names in order of first appearance.
/// A row without a field contributes a null to that column. Column types are
/// unified from the values (see [`crate::DataType::unify`]).
pub fn pivot_rows<I>(rows: I) -> Result<Table>
where
    I: IntoIterator<Item = Row>,
{
    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut data: Vec<Vec<Value>> = Vec::new();
    let mut num_rows = 0;

    for row in rows {
        for (name, value) in row {
            let col = match index.get(&name) {
                Some(&col) => col,
                None => {
                    let col = names.len();
                    index.insert(name.clone(), col);
                    names.push(name);
                    data.push(vec![Value::Null; num_rows]);
                    col
                }
            };
            data[col].push(value);
        }

        num_rows += 1;
        for values in &mut data {
            if values.len() < num_rows {
                values.push(Value::Null);
            }
        }
    }

    build_table(names, data, num_rows)
}

/// Pivot row records into a table with a declared column list.
///
/// Columns keep the declared order even when there are no rows. A field that
/// is not declared fails the pivot.
pub fn pivot_rows_with_columns<I, S>(names: &[S], rows: I) -> Result<Table>
where
    I: IntoIterator<Item = Row>,
    S: AsRef<str>,
{
    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_ref(), i))
        .collect();
    let mut data: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    let mut num_rows = 0;

    for row in rows {
        for (name, value) in row {
            let col = *index.get(name.as_str()).ok_or_else(|| {
                Error::SchemaMismatch(format!("row {num_rows} has undeclared field '{name}'"))
            })?;
            data[col].push(value);
        }

        num_rows += 1;
        for values in &mut data {
            if values.len() < num_rows {
                values.push(Value::Null);
            }
        }
    }

    let names = names.iter().map(|n| n.as_ref().to_string()).collect();
    build_table(names, data, num_rows)
}

fn build_table(names: Vec<String>, data: Vec<Vec<Value>>, num_rows: usize) -> Result<Table> {
    let columns = names
        .into_iter()
        .zip(data)
        .map(|(name, values)| Column::infer(name, values))
        .collect();

    Table::with_row_count(columns, num_rows)
}
