//! Parquet sink writer and source reader
//!
//! The writer encodes a whole table into one in-memory Parquet file with
//! per-chunk compression and no column statistics. The reader decodes a file
//! into row objects, refusing files whose chunks use a codec outside its
//! [`CodecRegistry`].

mod codec;
mod reader;
mod writer;

pub use codec::{Codec, CodecRegistry};
pub use reader::{read_parquet_file, read_parquet_table, ParquetReader, ParquetReaderOptions};
pub use writer::{ParquetWriter, ParquetWriterOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{FileFormat, SourceFormat};
    use crate::error::Error;
    use bytes::Bytes;
    use coldata_core::{Column, DataType, Row, Table, Value};
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use proptest::prelude::*;
    use test_case::test_case;

    fn results_table() -> Table {
        Table::try_new(vec![
            Column::infer("resultId", vec![1i64.into(), 2i64.into(), 3i64.into()]),
            Column::infer("driverRef", vec!["hamilton".into(), "heidfeld".into(), Value::Null]),
            Column::infer("points", vec![10.0f64.into(), 8.0f64.into(), 6.5f64.into()]),
            Column::infer("finished", vec![true.into(), false.into(), true.into()]),
            Column::nulls("notes", 3),
        ])
        .unwrap()
    }

    fn encode(table: &Table, options: ParquetWriterOptions) -> Vec<u8> {
        ParquetWriter::new(options).write_buffer(table).unwrap()
    }

    #[test]
    fn test_parquet_round_trip_rows() {
        let table = results_table();
        let buffer = encode(&table, ParquetWriterOptions::default());
        assert_eq!(FileFormat::source_from_content(&buffer), Some(SourceFormat::Parquet));

        let reader = ParquetReader::new(buffer, ParquetReaderOptions::default());
        assert_eq!(reader.num_rows().unwrap(), 3);

        let rows = reader.read_rows().unwrap();
        let expected: Vec<Row> = table.rows().collect();
        assert_eq!(rows, expected);
        assert_eq!(rows[0].get("resultId"), Some(&Value::Int64(1)));
    }

    #[test]
    fn test_parquet_round_trip_table() {
        let table = results_table();
        let buffer = encode(&table, ParquetWriterOptions::default());
        let decoded = ParquetReader::new(buffer, ParquetReaderOptions::default())
            .read_table()
            .unwrap();
        assert_eq!(decoded, table);
    }

    #[test_case(Codec::Snappy)]
    #[test_case(Codec::Gzip)]
    #[test_case(Codec::Brotli)]
    #[test_case(Codec::Lz4Raw)]
    #[test_case(Codec::Zstd)]
    fn test_chunks_use_configured_codec(codec: Codec) {
        let options = ParquetWriterOptions {
            codec,
            ..Default::default()
        };
        let buffer = encode(&results_table(), options);

        let file = SerializedFileReader::new(Bytes::from(buffer.clone())).unwrap();
        for chunk in file.metadata().row_group(0).columns() {
            assert_eq!(Codec::from(chunk.compression()), codec);
        }

        let rows = ParquetReader::new(buffer, ParquetReaderOptions::default())
            .read_rows()
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_uncompressed_option() {
        let options = ParquetWriterOptions {
            compressed: false,
            codec: Codec::Zstd,
            ..Default::default()
        };
        let buffer = encode(&results_table(), options);
        let file = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
        let chunk = file.metadata().row_group(0).column(0);
        assert_eq!(Codec::from(chunk.compression()), Codec::Uncompressed);
    }

    #[test]
    fn test_statistics_disabled_by_default() {
        let buffer = encode(&results_table(), ParquetWriterOptions::default());
        let file = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
        for chunk in file.metadata().row_group(0).columns() {
            assert!(chunk.statistics().is_none(), "{} has statistics", chunk.column_path());
        }

        let options = ParquetWriterOptions {
            statistics: true,
            ..Default::default()
        };
        let buffer = encode(&results_table(), options);
        let file = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
        assert!(file.metadata().row_group(0).column(0).statistics().is_some());
    }

    #[test]
    fn test_unsupported_codec_fails_without_rows() {
        let options = ParquetWriterOptions {
            codec: Codec::Gzip,
            ..Default::default()
        };
        let buffer = encode(&results_table(), options);

        let reader = ParquetReader::new(buffer, ParquetReaderOptions::default())
            .with_codecs(CodecRegistry::default().without(Codec::Gzip));

        let err = reader.read_rows().unwrap_err();
        match &err {
            Error::UnsupportedCodec { codec, column } => {
                assert_eq!(codec, "GZIP");
                assert_eq!(column, "resultId");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("GZIP"));
        assert!(reader.read_table().is_err());
    }

    #[test]
    fn test_empty_table_keeps_column_names() {
        let table = Table::empty(["resultId", "raceId"]).unwrap();
        let buffer = encode(&table, ParquetWriterOptions::default());

        let reader = ParquetReader::new(buffer, ParquetReaderOptions::default());
        assert!(reader.read_rows().unwrap().is_empty());

        let decoded = reader.read_table().unwrap();
        assert_eq!(decoded.num_rows(), 0);
        assert_eq!(decoded.column_names(), vec!["resultId", "raceId"]);
    }

    #[test]
    fn test_zero_column_table_rejected() {
        let table = Table::with_row_count(Vec::new(), 2).unwrap();
        let err = ParquetWriter::default().write_buffer(&table).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_small_row_groups() {
        let options = ParquetWriterOptions {
            max_row_group_size: 2,
            ..Default::default()
        };
        let buffer = encode(&results_table(), options);
        let file = SerializedFileReader::new(Bytes::from(buffer.clone())).unwrap();
        assert_eq!(file.metadata().num_row_groups(), 2);

        let decoded = ParquetReader::new(buffer, ParquetReaderOptions::default())
            .read_table()
            .unwrap();
        assert_eq!(decoded, results_table());
    }

    #[test]
    fn test_corrupt_file() {
        let reader = ParquetReader::new(
            b"PAR1 definitely not parquet".to_vec(),
            ParquetReaderOptions::default(),
        );
        assert!(matches!(reader.read_rows(), Err(Error::Parquet(_))));
    }

    #[test]
    fn test_read_parquet_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.parquet");
        ParquetWriter::default().write_file(&path, &results_table()).unwrap();

        let rows = read_parquet_file(&path, ParquetReaderOptions::default()).unwrap();
        assert_eq!(rows.len(), 3);

        let table = read_parquet_table(&path, ParquetReaderOptions::default()).unwrap();
        assert_eq!(table.column("points").unwrap().data_type(), DataType::Float64);

        let missing =
            read_parquet_file(dir.path().join("absent.parquet"), ParquetReaderOptions::default());
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    fn value_strategy(data_type: DataType) -> BoxedStrategy<Value> {
        let non_null = match data_type {
            DataType::Null => Just(Value::Null).boxed(),
            DataType::Boolean => any::<bool>().prop_map(Value::Boolean).boxed(),
            DataType::Int64 => any::<i64>().prop_map(Value::Int64).boxed(),
            DataType::Float64 => (-1.0e9f64..1.0e9).prop_map(Value::Float64).boxed(),
            DataType::Utf8 => "[a-zA-Z0-9 ,.]{0,12}".prop_map(Value::Utf8).boxed(),
        };
        prop_oneof![1 => Just(Value::Null), 4 => non_null].boxed()
    }

    fn column_strategy(rows: usize) -> impl Strategy<Value = (DataType, Vec<Value>)> {
        prop_oneof![
            Just(DataType::Boolean),
            Just(DataType::Int64),
            Just(DataType::Float64),
            Just(DataType::Utf8),
        ]
        .prop_flat_map(move |t| {
            proptest::collection::vec(value_strategy(t), rows).prop_map(move |v| (t, v))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_parquet_rows_match_table(
            columns in (1usize..12).prop_flat_map(|rows| {
                proptest::collection::vec(column_strategy(rows), 1..5)
            })
        ) {
            let columns: Vec<Column> = columns
                .into_iter()
                .enumerate()
                .map(|(i, (t, values))| Column::try_new(format!("c{i}"), t, values).unwrap())
                .collect();
            let table = Table::try_new(columns).unwrap();

            let buffer = ParquetWriter::default().write_buffer(&table).unwrap();
            let rows = ParquetReader::new(buffer, ParquetReaderOptions::default())
                .read_rows()
                .unwrap();

            prop_assert_eq!(rows.len(), table.num_rows());
            let expected: Vec<Row> = table.rows().collect();
            prop_assert_eq!(rows, expected);
        }
    }
}
