//! Parquet reader producing row objects

use std::fs;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::ParquetMetaData;
use tracing::debug;

use coldata_core::{pivot_rows_with_columns, Row, Table, Value};

use crate::arrow::array_to_values;
use crate::error::{Error, Result};

use super::codec::{Codec, CodecRegistry};

/// Options for Parquet reader
#[derive(Debug, Clone)]
pub struct ParquetReaderOptions {
    /// Codecs the reader may decompress
    pub codecs: CodecRegistry,

    /// Batch size for decoding records
    pub batch_size: usize,
}

impl Default for ParquetReaderOptions {
    fn default() -> Self {
        Self {
            codecs: CodecRegistry::default(),
            batch_size: 8192,
        }
    }
}

/// Parquet reader over an in-memory file
pub struct ParquetReader {
    /// Whole file contents
    data: Bytes,

    /// Options for reading
    options: ParquetReaderOptions,
}

impl ParquetReader {
    /// Create a new Parquet reader over file contents
    pub fn new(data: impl Into<Bytes>, options: ParquetReaderOptions) -> Self {
        Self {
            data: data.into(),
            options,
        }
    }

    /// Replace the codecs the reader may decompress
    #[must_use]
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.options.codecs = codecs;
        self
    }

    fn builder(&self) -> Result<ParquetRecordBatchReaderBuilder<Bytes>> {
        Ok(ParquetRecordBatchReaderBuilder::try_new(self.data.clone())?)
    }

    /// Total row count recorded in the footer
    pub fn num_rows(&self) -> Result<usize> {
        let rows = self.builder()?.metadata().file_metadata().num_rows();
        usize::try_from(rows).map_err(|_| Error::Format(format!("negative row count {rows}")))
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Result<Vec<String>> {
        Ok(self
            .builder()?
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect())
    }

    /// Fail if any column chunk uses a codec outside the registry
    fn check_codecs(&self, metadata: &ParquetMetaData) -> Result<()> {
        for row_group in metadata.row_groups() {
            for chunk in row_group.columns() {
                let codec = Codec::from(chunk.compression());
                if !self.options.codecs.supports(codec) {
                    return Err(Error::UnsupportedCodec {
                        codec: codec.to_string(),
                        column: chunk.column_path().string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Decode every record batch after validating codecs
    fn read_batches(&self) -> Result<(SchemaRef, Vec<RecordBatch>)> {
        let builder = self.builder()?;
        self.check_codecs(builder.metadata())?;

        let schema = builder.schema().clone();
        let reader = builder.with_batch_size(self.options.batch_size.max(1)).build()?;
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            batches = batches.len(),
            columns = schema.fields().len(),
            "decoded Parquet record batches"
        );

        Ok((schema, batches))
    }

    /// Decode the file into row objects
    pub fn read_rows(&self) -> Result<Vec<Row>> {
        let (schema, batches) = self.read_batches()?;
        let names: Vec<&String> = schema.fields().iter().map(|f| f.name()).collect();

        let total = batches.iter().map(RecordBatch::num_rows).sum();
        let mut rows = Vec::with_capacity(total);

        for batch in &batches {
            let mut columns = batch
                .columns()
                .iter()
                .map(|array| array_to_values(array.as_ref()).map(Vec::into_iter))
                .collect::<Result<Vec<_>>>()?;

            for _ in 0..batch.num_rows() {
                let row: Row = names
                    .iter()
                    .zip(columns.iter_mut())
                    .map(|(name, values)| (name.as_str(), values.next().unwrap_or(Value::Null)))
                    .collect();
                rows.push(row);
            }
        }

        Ok(rows)
    }

    /// Decode the file and pivot its rows into a table.
    ///
    /// Columns follow the file schema, so a zero-row file keeps its names.
    pub fn read_table(&self) -> Result<Table> {
        let names = self.column_names()?;
        let rows = self.read_rows()?;
        Ok(pivot_rows_with_columns(&names, rows)?)
    }
}

/// Read a Parquet file into row objects.
///
/// A missing file fails before any decoding starts.
pub fn read_parquet_file<P: AsRef<Path>>(
    path: P,
    options: ParquetReaderOptions,
) -> Result<Vec<Row>> {
    let data = fs::read(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = data.len(), "reading Parquet");
    ParquetReader::new(data, options).read_rows()
}

/// Read a Parquet file into a table
pub fn read_parquet_table<P: AsRef<Path>>(path: P, options: ParquetReaderOptions) -> Result<Table> {
    let data = fs::read(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = data.len(), "reading Parquet");
    ParquetReader::new(data, options).read_table()
}
