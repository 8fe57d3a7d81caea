//! Conversion jobs
//!
//! A [`Job`] names one input file and one output file. The [`Converter`]
//! decodes the input into a [`Table`] and encodes it with the configured sink
//! writer. The output is only touched once the input has been fully decoded.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use coldata_readers::arrow::{read_arrow_file, ArrowWriter};
use coldata_readers::csv::{read_csv_file, CsvReaderOptions};
use coldata_readers::parquet::{read_parquet_table, ParquetReaderOptions, ParquetWriter};
use coldata_readers::{FileFormat, SinkFormat, SourceFormat, Table};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};

/// One input to output conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Name used in logs and reports
    pub name: String,

    /// Input file
    pub input: PathBuf,

    /// Output file, created or replaced
    pub output: PathBuf,

    /// Input format, detected from the extension or the leading magic
    /// bytes when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFormat>,

    /// Output format, detected from the extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<SinkFormat>,
}

impl Job {
    /// Create a job whose formats follow the file extensions
    pub fn new(
        name: impl Into<String>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            source: None,
            sink: None,
        }
    }

    /// Set the input format explicitly
    #[must_use]
    pub fn with_source(mut self, format: SourceFormat) -> Self {
        self.source = Some(format);
        self
    }

    /// Set the output format explicitly
    #[must_use]
    pub fn with_sink(mut self, format: SinkFormat) -> Self {
        self.sink = Some(format);
        self
    }

    /// Input format of this job.
    ///
    /// An input whose extension names no format is identified by its magic
    /// bytes. Nothing is ever written while detecting.
    pub fn source_format(&self) -> Result<SourceFormat> {
        self.source
            .or_else(|| FileFormat::source_from_path(&self.input))
            .or_else(|| sniff_source(&self.input))
            .ok_or_else(|| Error::UnknownFormat {
                kind: "source",
                path: self.input.clone(),
            })
    }

    /// Output format of this job
    pub fn sink_format(&self) -> Result<SinkFormat> {
        self.sink
            .or_else(|| FileFormat::sink_from_path(&self.output))
            .ok_or_else(|| Error::UnknownFormat {
                kind: "sink",
                path: self.output.clone(),
            })
    }
}

/// Identify a source from the first bytes of `path`; unreadable files give `None`
fn sniff_source(path: &Path) -> Option<SourceFormat> {
    let mut head = [0u8; 4];
    File::open(path).ok()?.read_exact(&mut head).ok()?;
    FileFormat::source_from_content(&head)
}

/// Outcome of a finished job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    /// Job name
    pub name: String,

    /// Output file
    pub output: PathBuf,

    /// Rows written
    pub rows: usize,

    /// Columns written
    pub columns: usize,

    /// Size of the output file
    pub bytes_written: usize,

    /// Wall time for decode and encode
    pub elapsed_secs: f64,
}

/// Runs jobs with a fixed set of readers and writers
#[derive(Debug, Clone, Default)]
pub struct Converter {
    csv: CsvReaderOptions,
    parquet_reader: ParquetReaderOptions,
    parquet_writer: ParquetWriter,
    arrow_writer: ArrowWriter,
}

impl Converter {
    /// Build a converter from the shared settings of a configuration.
    ///
    /// Every setting is validated here, so a bad setting fails before any
    /// job reads or writes a file.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            csv: config.csv.reader_options()?,
            parquet_reader: ParquetReaderOptions::default(),
            parquet_writer: ParquetWriter::new(config.parquet.writer_options()),
            arrow_writer: ArrowWriter::new(config.arrow.writer_options())?,
        })
    }

    /// Replace the Parquet reader options
    #[must_use]
    pub fn with_parquet_reader(mut self, options: ParquetReaderOptions) -> Self {
        self.parquet_reader = options;
        self
    }

    /// Decode `path` into a table
    pub fn read_source(&self, path: &Path, format: SourceFormat) -> Result<Table> {
        let table = match format {
            SourceFormat::Csv => read_csv_file(path, self.csv.clone())?,
            SourceFormat::Arrow => read_arrow_file(path)?,
            SourceFormat::Parquet => read_parquet_table(path, self.parquet_reader.clone())?,
        };
        Ok(table)
    }

    /// Encode `table` into `path`, returning the bytes written
    pub fn write_sink(&self, path: &Path, format: SinkFormat, table: &Table) -> Result<usize> {
        let written = match format {
            SinkFormat::Parquet => self.parquet_writer.write_file(path, table)?,
            SinkFormat::Arrow => self.arrow_writer.write_file(path, table)?,
        };
        Ok(written)
    }

    /// Run one job.
    ///
    /// Formats are resolved before the output is touched, and a failed decode
    /// leaves the output file as it was.
    pub fn convert(&self, job: &Job) -> Result<JobReport> {
        let source = job.source_format()?;
        let sink = job.sink_format()?;
        let start = Instant::now();

        debug!(job = %job.name, input = %job.input.display(), %source, "decoding input");
        let table = self.read_source(&job.input, source)?;

        debug!(
            job = %job.name,
            output = %job.output.display(),
            %sink,
            rows = table.num_rows(),
            columns = table.num_columns(),
            "encoding output"
        );
        let bytes_written = self.write_sink(&job.output, sink, &table)?;

        let report = JobReport {
            name: job.name.clone(),
            output: job.output.clone(),
            rows: table.num_rows(),
            columns: table.num_columns(),
            bytes_written,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        info!(
            job = %report.name,
            rows = report.rows,
            bytes = report.bytes_written,
            "job finished"
        );

        Ok(report)
    }
}
