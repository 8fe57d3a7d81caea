//! Schema derivation for columnar sinks
//!
//! The derived schema carries column names only. Physical types are left to
//! the sink, which reads them off each column's [`crate::DataType`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// One output column of a sink schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaElement {
    /// Column name, copied verbatim from the table
    pub name: String,
}

impl SchemaElement {
    /// Create a schema element
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A schema element joined back to the column data it names
#[derive(Debug, Clone, Copy)]
pub struct ColumnSource<'a> {
    /// Column name
    pub name: &'a str,

    /// Column data
    pub column: &'a Column,
}

/// Derive one schema element per column, in column order
pub fn derive_schema(table: &Table) -> Vec<SchemaElement> {
    table
        .column_names()
        .into_iter()
        .map(SchemaElement::new)
        .collect()
}

/// Pair each schema element with the column of the same name
pub fn column_sources<'a>(
    schema: &'a [SchemaElement],
    table: &'a Table,
) -> Result<Vec<ColumnSource<'a>>> {
    schema
        .iter()
        .map(|element| {
            table
                .column(&element.name)
                .map(|column| ColumnSource {
                    name: &element.name,
                    column,
                })
                .ok_or_else(|| Error::ColumnNotFound(element.name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use proptest::prelude::*;

    fn table_with_names(names: &[String], rows: usize) -> Table {
        let columns = names
            .iter()
            .map(|n| Column::infer(n.clone(), vec![Value::Int64(1); rows]))
            .collect();
        Table::try_new(columns).unwrap()
    }

    #[test]
    fn test_column_sources_missing_column() {
        let table = table_with_names(&["a".to_string()], 1);
        let schema = vec![SchemaElement::new("a"), SchemaElement::new("b")];
        assert_eq!(
            column_sources(&schema, &table).unwrap_err(),
            Error::ColumnNotFound("b".into())
        );
    }

    #[test]
    fn test_column_sources_follow_schema_order() {
        let table = table_with_names(&["x".to_string(), "y".to_string()], 2);
        let schema = vec![SchemaElement::new("y"), SchemaElement::new("x")];
        let sources = column_sources(&schema, &table).unwrap();
        assert_eq!(sources[0].name, "y");
        assert_eq!(sources[0].column.name(), "y");
        assert_eq!(sources[1].column.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_schema_matches_columns(
            names in proptest::collection::hash_set("[a-zA-Z_][a-zA-Z0-9_]{0,12}", 0..16),
            rows in 0usize..4,
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let table = table_with_names(&names, rows);

            let schema = derive_schema(&table);
            prop_assert_eq!(schema.len(), table.num_columns());
            for (element, name) in schema.iter().zip(table.column_names()) {
                prop_assert_eq!(element.name.as_str(), name);
            }

            let sources = column_sources(&schema, &table).unwrap();
            prop_assert_eq!(sources.len(), names.len());
        }
    }
}
