//! Job configuration
//!
//! Jobs are data: a [`PipelineConfig`] lists them together with the format
//! settings shared by every job. The built-in default reproduces the Formula 1
//! dataset preparation run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use coldata_readers::arrow::{ArrowWriterOptions, DEFAULT_COMPRESSION_LEVEL};
use coldata_readers::csv::CsvReaderOptions;
use coldata_readers::parquet::{Codec, ParquetWriterOptions};

use crate::error::{Error, Result};
use crate::job::Job;

/// Directory the default jobs read from and write to
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Subdirectory of [`DEFAULT_DATA_DIR`] holding the F1 CSV export
pub const F1_SOURCE_DIR: &str = "rohanrao--formula-1-world-championship-1950-2020";

/// CSV decoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Field delimiter
    pub delimiter: char,

    /// Whether to trim whitespace around fields
    pub trim: bool,

    /// Cell contents that read as null
    pub null_values: Vec<String>,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim: false,
            null_values: vec![String::new()],
        }
    }
}

impl CsvSettings {
    /// Reader options for these settings
    pub fn reader_options(&self) -> Result<CsvReaderOptions> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Error::Config(format!("CSV delimiter {:?} is not ASCII", self.delimiter))
            })?;

        Ok(CsvReaderOptions {
            delimiter,
            trim: self.trim,
            null_values: self.null_values.clone(),
            ..CsvReaderOptions::default()
        })
    }
}

/// Parquet encoding settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParquetSettings {
    /// Whether column chunks are compressed
    pub compressed: bool,

    /// Whether column statistics are written
    pub statistics: bool,

    /// Codec for compressed chunks
    pub codec: Codec,

    /// Maximum rows per row group
    pub max_row_group_size: usize,
}

impl Default for ParquetSettings {
    fn default() -> Self {
        let options = ParquetWriterOptions::default();
        Self {
            compressed: options.compressed,
            statistics: options.statistics,
            codec: options.codec,
            max_row_group_size: options.max_row_group_size,
        }
    }
}

impl ParquetSettings {
    /// Writer options for these settings
    pub fn writer_options(&self) -> ParquetWriterOptions {
        ParquetWriterOptions {
            compressed: self.compressed,
            statistics: self.statistics,
            codec: self.codec,
            max_row_group_size: self.max_row_group_size,
        }
    }
}

/// Arrow encoding settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowSettings {
    /// zstd level for the whole IPC buffer
    pub compression_level: i32,
}

impl Default for ArrowSettings {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ArrowSettings {
    /// Writer options for these settings
    pub fn writer_options(&self) -> ArrowWriterOptions {
        ArrowWriterOptions {
            compression_level: self.compression_level,
        }
    }
}

/// A batch of conversion jobs and their shared settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Jobs, run in order
    pub jobs: Vec<Job>,

    /// CSV decoding settings
    #[serde(default)]
    pub csv: CsvSettings,

    /// Parquet encoding settings
    #[serde(default)]
    pub parquet: ParquetSettings,

    /// Arrow encoding settings
    #[serde(default)]
    pub arrow: ArrowSettings,
}

impl PipelineConfig {
    /// Create a configuration with default settings
    pub fn new(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            csv: CsvSettings::default(),
            parquet: ParquetSettings::default(),
            arrow: ArrowSettings::default(),
        }
    }

    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The Formula 1 dataset jobs rooted at `data_dir`.
    ///
    /// `results.csv` and `races.csv` each become a Parquet file and a
    /// zstd-compressed Arrow file. The export marks missing values as `\N`.
    pub fn formula_one(data_dir: &Path) -> Self {
        let source_dir = data_dir.join(F1_SOURCE_DIR);
        let mut jobs = Vec::new();

        for dataset in ["results", "races"] {
            jobs.push(Job::new(
                format!("{dataset} to parquet"),
                source_dir.join(format!("{dataset}.csv")),
                data_dir.join(format!("f1-1950-2020-{dataset}.parquet")),
            ));
        }
        for dataset in ["results", "races"] {
            jobs.push(Job::new(
                format!("{dataset} to arrow"),
                source_dir.join(format!("{dataset}.csv")),
                data_dir.join(format!("f1-1950-2020-{dataset}.zstd.arrow")),
            ));
        }

        Self {
            csv: CsvSettings {
                null_values: vec![String::new(), "\\N".to_string()],
                ..CsvSettings::default()
            },
            ..Self::new(jobs)
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::formula_one(&PathBuf::from(DEFAULT_DATA_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldata_readers::{SinkFormat, SourceFormat};

    #[test]
    fn test_default_jobs() {
        let config = PipelineConfig::default();
        assert_eq!(config.jobs.len(), 4);

        let first = &config.jobs[0];
        assert!(first
            .input
            .ends_with("rohanrao--formula-1-world-championship-1950-2020/results.csv"));
        assert_eq!(first.output, Path::new("./data/f1-1950-2020-results.parquet"));
        assert_eq!(first.source_format().unwrap(), SourceFormat::Csv);
        assert_eq!(first.sink_format().unwrap(), SinkFormat::Parquet);

        let last = &config.jobs[3];
        assert_eq!(last.output, Path::new("./data/f1-1950-2020-races.zstd.arrow"));
        assert_eq!(last.sink_format().unwrap(), SinkFormat::Arrow);

        assert!(config.csv.null_values.contains(&"\\N".to_string()));
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = PipelineConfig::from_json(
            r#"{
                "jobs": [
                    {"name": "laps", "input": "in/laps.csv", "output": "out/laps.parquet"},
                    {"name": "legacy", "input": "in/old.bin", "output": "out/old.bin",
                     "source": "parquet", "sink": "arrow"}
                ],
                "parquet": {"codec": "zstd"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[1].source_format().unwrap(), SourceFormat::Parquet);
        assert_eq!(config.jobs[1].sink_format().unwrap(), SinkFormat::Arrow);
        assert_eq!(config.parquet.codec, Codec::Zstd);
        assert!(config.parquet.compressed);
        assert!(!config.parquet.statistics);
        assert_eq!(config.arrow.compression_level, DEFAULT_COMPRESSION_LEVEL);
        assert_eq!(config.csv, CsvSettings::default());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(PipelineConfig::from_json("{\"jobs\": 3}"), Err(Error::Json(_))));
    }

    #[test]
    fn test_non_ascii_delimiter() {
        let settings = CsvSettings {
            delimiter: '§',
            ..Default::default()
        };
        assert!(matches!(settings.reader_options(), Err(Error::Config(_))));

        let settings = CsvSettings {
            delimiter: ';',
            ..Default::default()
        };
        assert_eq!(settings.reader_options().unwrap().delimiter, b';');
    }
}
