//! Parquet writer implementation

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter as ArrowParquetWriter;
use parquet::basic::Compression;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use tracing::debug;

use coldata_core::{column_sources, derive_schema, Table};

use crate::arrow::{arrow_type, column_to_array};
use crate::error::{Error, Result};

use super::codec::Codec;

/// Options for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterOptions {
    /// Whether column chunks are compressed
    pub compressed: bool,

    /// Whether to write min/max/null-count statistics
    pub statistics: bool,

    /// Codec used when `compressed` is set
    pub codec: Codec,

    /// Row group size (number of rows)
    pub max_row_group_size: usize,
}

impl Default for ParquetWriterOptions {
    fn default() -> Self {
        Self {
            compressed: true,
            statistics: false,
            codec: Codec::Snappy,
            max_row_group_size: 1024 * 1024,
        }
    }
}

impl ParquetWriterOptions {
    /// Build writer properties from these options
    pub fn properties(&self) -> WriterProperties {
        let compression = if self.compressed {
            self.codec.compression()
        } else {
            Compression::UNCOMPRESSED
        };

        let statistics = if self.statistics {
            EnabledStatistics::Page
        } else {
            EnabledStatistics::None
        };

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.max_row_group_size.max(1))
            .build()
    }
}

/// Parquet writer producing complete in-memory Parquet files
#[derive(Debug, Clone, Default)]
pub struct ParquetWriter {
    /// Writer options
    options: ParquetWriterOptions,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(options: ParquetWriterOptions) -> Self {
        Self { options }
    }

    /// Get the writer options
    pub fn options(&self) -> &ParquetWriterOptions {
        &self.options
    }

    /// Encode the table as a self-contained Parquet file.
    ///
    /// The schema carries column names only; each column's physical type
    /// follows from its table type.
    pub fn write_buffer(&self, table: &Table) -> Result<Vec<u8>> {
        if table.num_columns() == 0 {
            return Err(Error::Unsupported(
                "Parquet output needs at least one column".into(),
            ));
        }

        let schema = derive_schema(table);
        let sources = column_sources(&schema, table)?;

        let fields: Vec<Field> = sources
            .iter()
            .map(|s| Field::new(s.name, arrow_type(s.column.data_type()), true))
            .collect();
        let arrays: Vec<ArrayRef> = sources.iter().map(|s| column_to_array(s.column)).collect();

        let arrow_schema = Arc::new(Schema::new(fields));
        let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
        let batch = RecordBatch::try_new_with_options(arrow_schema.clone(), arrays, &options)?;

        let mut buffer = Vec::new();
        let properties = self.options.properties();
        let mut writer = ArrowParquetWriter::try_new(&mut buffer, arrow_schema, Some(properties))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            bytes = buffer.len(),
            codec = %self.options.codec,
            compressed = self.options.compressed,
            "encoded Parquet buffer"
        );

        Ok(buffer)
    }

    /// Write the table to `path`, replacing any existing file.
    ///
    /// The output is fully built in memory before the file is touched.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, table: &Table) -> Result<usize> {
        let buffer = self.write_buffer(table)?;
        fs::write(path, &buffer)?;
        Ok(buffer.len())
    }
}
