//! CSV parser for converting raw text cells to typed columns
//!
//! Inference runs over every non-null cell of a column:
//!
//! * no non-null cells: `Null`
//! * all `true`/`false` (ASCII case-insensitive): `Boolean`
//! * all integers fitting `i64`: `Int64`
//! * all finite decimals (integers included): `Float64`
//! * anything else: `Utf8`, with the original text kept verbatim
//!
//! An integer literal outside the `i64` range counts as text, so long
//! identifiers never lose digits to a float.

use coldata_core::{Column, DataType, Value};

/// CSV parser that converts raw text columns to typed columns
#[derive(Debug, Clone)]
pub struct CsvParser {
    /// Cell contents that read as null
    null_values: Vec<String>,
}

impl CsvParser {
    /// Create a new CSV parser
    pub fn new(null_values: Vec<String>) -> Self {
        Self { null_values }
    }

    /// Check if a cell reads as null
    pub fn is_null(&self, cell: &str) -> bool {
        self.null_values.iter().any(|n| n == cell)
    }

    /// Infer the data type for a column of raw cells
    pub fn infer_data_type<S: AsRef<str>>(&self, cells: &[S]) -> DataType {
        cells
            .iter()
            .map(AsRef::as_ref)
            .filter(|cell| !self.is_null(cell))
            .map(|cell| classify(cell).data_type())
            .fold(DataType::Null, DataType::unify)
    }

    /// Parse one column of raw cells into a typed column
    pub fn parse_column(&self, name: &str, cells: Vec<String>) -> Column {
        let data_type = self.infer_data_type(&cells);

        let values = cells
            .into_iter()
            .map(|cell| {
                if self.is_null(&cell) {
                    Value::Null
                } else if data_type == DataType::Utf8 {
                    Value::Utf8(cell)
                } else {
                    classify(&cell).coerce(data_type)
                }
            })
            .collect();

        Column::infer(name, values)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(vec![String::new()])
    }
}

/// Narrowest typed reading of a single non-null cell
fn classify(cell: &str) -> Value {
    if cell.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Value::Int64(v);
    }
    if is_integer_literal(cell) {
        return Value::Utf8(cell.to_string());
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Value::Float64(v),
        _ => Value::Utf8(cell.to_string()),
    }
}

/// Optional sign followed by one or more ASCII digits
fn is_integer_literal(cell: &str) -> bool {
    let digits = cell.strip_prefix(['+', '-']).unwrap_or(cell);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&["1", "2", "-3"], DataType::Int64; "integers")]
    #[test_case(&["1", "2.5", ""], DataType::Float64; "ints promote to floats")]
    #[test_case(&["1e3", "0.25"], DataType::Float64; "exponent")]
    #[test_case(&["TRUE", "false"], DataType::Boolean; "booleans")]
    #[test_case(&["1", "true"], DataType::Utf8; "bool and int mix")]
    #[test_case(&["NaN", "1.0"], DataType::Utf8; "non-finite is text")]
    #[test_case(&["", ""], DataType::Null; "all null")]
    #[test_case(&["Hamilton", "44"], DataType::Utf8; "text")]
    #[test_case(&["9223372036854775808", "1"], DataType::Utf8; "i64 overflow is text")]
    #[test_case(&["-9223372036854775808"], DataType::Int64; "i64 minimum")]
    fn test_infer_data_type(cells: &[&str], expected: DataType) {
        assert_eq!(CsvParser::default().infer_data_type(cells), expected);
    }

    #[test]
    fn test_custom_null_values() {
        let parser = CsvParser::new(vec![String::new(), "\\N".to_string()]);
        let column = parser.parse_column(
            "position",
            vec!["1".into(), "\\N".into(), "".into(), "3".into()],
        );
        assert_eq!(column.data_type(), DataType::Int64);
        assert_eq!(
            column.values(),
            &[Value::Int64(1), Value::Null, Value::Null, Value::Int64(3)]
        );
    }

    #[test]
    fn test_text_columns_keep_raw_cells() {
        let column =
            CsvParser::default().parse_column("code", vec!["007".into(), "HAM".into()]);
        assert_eq!(column.data_type(), DataType::Utf8);
        assert_eq!(column.values(), &[Value::from("007"), Value::from("HAM")]);
    }

    #[test]
    fn test_overflowing_integers_keep_digits() {
        let column = CsvParser::default()
            .parse_column("id", vec!["18446744073709551616".into(), "-7".into()]);
        assert_eq!(column.data_type(), DataType::Utf8);
        assert_eq!(
            column.values(),
            &[Value::from("18446744073709551616"), Value::from("-7")]
        );
    }

    #[test]
    fn test_float_column_values() {
        let column =
            CsvParser::default().parse_column("points", vec!["10".into(), "4.5".into()]);
        assert_eq!(column.values(), &[Value::Float64(10.0), Value::Float64(4.5)]);
    }
}
