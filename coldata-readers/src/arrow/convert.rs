//! Conversion between [`Table`] and Arrow record batches
//!
//! Table types map one-to-one onto Arrow types. When reading, integer widths
//! widen to `Int64` and float widths to `Float64`; any other Arrow type is
//! read through its string rendering.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, NullArray, StringArray,
};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType as ArrowType, Field, Float64Type, Int64Type, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use coldata_core::{Column, DataType, Table, Value};

use crate::error::{Error, Result};

/// Arrow type used to store a column of `data_type`
pub fn arrow_type(data_type: DataType) -> ArrowType {
    match data_type {
        DataType::Null => ArrowType::Null,
        DataType::Boolean => ArrowType::Boolean,
        DataType::Int64 => ArrowType::Int64,
        DataType::Float64 => ArrowType::Float64,
        DataType::Utf8 => ArrowType::Utf8,
    }
}

/// Table type an Arrow column is read as
pub fn table_type(arrow_type: &ArrowType) -> DataType {
    match arrow_type {
        ArrowType::Null => DataType::Null,
        ArrowType::Boolean => DataType::Boolean,
        t if t.is_integer() => DataType::Int64,
        t if t.is_floating() => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Arrow schema of a table; every field is nullable
pub fn table_schema(table: &Table) -> SchemaRef {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|c| Field::new(c.name(), arrow_type(c.data_type()), true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Build the Arrow array holding a column's values
pub fn column_to_array(column: &Column) -> ArrayRef {
    let values = column.values();
    match column.data_type() {
        DataType::Null => Arc::new(NullArray::new(values.len())),
        DataType::Boolean => Arc::new(
            values.iter().map(Value::as_bool).collect::<BooleanArray>(),
        ),
        DataType::Int64 => Arc::new(
            values.iter().map(Value::as_i64).collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            values.iter().map(Value::as_f64).collect::<Float64Array>(),
        ),
        DataType::Utf8 => Arc::new(
            values.iter().map(Value::as_str).collect::<StringArray>(),
        ),
    }
}

/// Convert a table into a single record batch
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch> {
    let arrays = table.columns().iter().map(column_to_array).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    Ok(RecordBatch::try_new_with_options(table_schema(table), arrays, &options)?)
}

/// Read the values of an Arrow array
pub fn array_to_values(array: &dyn Array) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(array.len());

    match table_type(array.data_type()) {
        DataType::Null => values.resize(array.len(), Value::Null),
        DataType::Boolean => {
            values.extend(array.as_boolean().iter().map(Value::from));
        }
        DataType::Int64 => {
            // Overflowing unsigned values are an error rather than a null
            let options = CastOptions {
                safe: false,
                ..Default::default()
            };
            let ints = cast_with_options(array, &ArrowType::Int64, &options)?;
            values.extend(ints.as_primitive::<Int64Type>().iter().map(Value::from));
        }
        DataType::Float64 => {
            let floats = cast(array, &ArrowType::Float64)?;
            values.extend(floats.as_primitive::<Float64Type>().iter().map(Value::from));
        }
        DataType::Utf8 => {
            let strings = match array.data_type() {
                ArrowType::Utf8 => None,
                _ => Some(cast(array, &ArrowType::Utf8)?),
            };
            let strings = strings.as_deref().unwrap_or(array);
            values.extend(strings.as_string::<i32>().iter().map(Value::from));
        }
    }

    Ok(values)
}

/// Concatenate record batches sharing `schema` into a table
pub fn record_batches_to_table(schema: &Schema, batches: &[RecordBatch]) -> Result<Table> {
    let num_rows = batches.iter().map(RecordBatch::num_rows).sum();
    let mut columns = Vec::with_capacity(schema.fields().len());

    for (index, field) in schema.fields().iter().enumerate() {
        let mut values = Vec::with_capacity(num_rows);
        for batch in batches {
            let array = batch.columns().get(index).ok_or_else(|| {
                Error::Schema(format!("record batch is missing column '{}'", field.name()))
            })?;
            values.extend(array_to_values(array.as_ref())?);
        }

        let column = Column::try_new(field.name().as_str(), table_type(field.data_type()), values)?;
        columns.push(column);
    }

    Ok(Table::with_row_count(columns, num_rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Date32Array, Int32Array, UInt64Array};

    #[test]
    fn test_record_batch_shape() {
        let table = Table::try_new(vec![
            Column::infer("id", vec![1i64.into(), 2i64.into()]),
            Column::infer("name", vec!["a".into(), Value::Null]),
            Column::nulls("empty", 2),
        ])
        .unwrap();

        let batch = table_to_record_batch(&table).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).data_type(), &ArrowType::Int64);
        assert_eq!(batch.schema().field(2).data_type(), &ArrowType::Null);
        assert_eq!(batch.column(1).null_count(), 1);
    }

    #[test]
    fn test_zero_column_batch_keeps_row_count() {
        let table = Table::with_row_count(Vec::new(), 3).unwrap();
        let batch = table_to_record_batch(&table).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 0);
    }

    #[test]
    fn test_narrow_integers_widen() {
        let array = Int32Array::from(vec![Some(7), None]);
        assert_eq!(array_to_values(&array).unwrap(), vec![Value::Int64(7), Value::Null]);
    }

    #[test]
    fn test_unsigned_overflow_is_error() {
        let array = UInt64Array::from(vec![u64::MAX]);
        assert!(matches!(array_to_values(&array), Err(Error::Arrow(_))));
    }

    #[test]
    fn test_other_types_read_as_text() {
        let array = Date32Array::from(vec![Some(0), None]);
        assert_eq!(table_type(array.data_type()), DataType::Utf8);
        assert_eq!(
            array_to_values(&array).unwrap(),
            vec![Value::from("1970-01-01"), Value::Null]
        );
    }

    #[test]
    fn test_batches_concatenate() {
        let table = Table::try_new(vec![Column::infer("x", vec![1.5f64.into()])]).unwrap();
        let batch = table_to_record_batch(&table).unwrap();
        let schema = batch.schema();

        let joined = record_batches_to_table(&schema, &[batch.clone(), batch]).unwrap();
        assert_eq!(joined.num_rows(), 2);
        assert_eq!(
            joined.column("x").unwrap().values(),
            &[Value::Float64(1.5), Value::Float64(1.5)]
        );
    }
}
