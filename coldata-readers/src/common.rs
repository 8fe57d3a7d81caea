//! Format identification shared by readers, writers and the pipeline

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Zstandard frame magic number, little endian
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Parquet file magic
pub const PARQUET_MAGIC: [u8; 4] = *b"PAR1";

/// Input formats a source reader can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Header-delimited CSV text
    Csv,
    /// Zstd-compressed Arrow IPC file
    Arrow,
    /// Parquet file
    Parquet,
}

/// Output formats a sink writer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Zstd-compressed Arrow IPC file
    Arrow,
    /// Parquet file
    Parquet,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => f.write_str("csv"),
            SourceFormat::Arrow => f.write_str("arrow"),
            SourceFormat::Parquet => f.write_str("parquet"),
        }
    }
}

impl fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkFormat::Arrow => f.write_str("arrow"),
            SinkFormat::Parquet => f.write_str("parquet"),
        }
    }
}

/// File format detection utilities
pub struct FileFormat;

impl FileFormat {
    /// Detect the source format of a file based on its extension.
    ///
    /// `.zstd.arrow` and plain `.arrow` both name compressed Arrow files.
    pub fn source_from_path(path: &Path) -> Option<SourceFormat> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "csv" | "tsv" => Some(SourceFormat::Csv),
            "parquet" => Some(SourceFormat::Parquet),
            "arrow" | "arrows" | "ipc" => Some(SourceFormat::Arrow),
            _ => None,
        }
    }

    /// Detect the sink format of a file based on its extension
    pub fn sink_from_path(path: &Path) -> Option<SinkFormat> {
        match Self::source_from_path(path)? {
            SourceFormat::Csv => None,
            SourceFormat::Arrow => Some(SinkFormat::Arrow),
            SourceFormat::Parquet => Some(SinkFormat::Parquet),
        }
    }

    /// Detect the source format by inspecting file content
    pub fn source_from_content(data: &[u8]) -> Option<SourceFormat> {
        if data.len() < 4 {
            return None;
        }

        if data[..4] == PARQUET_MAGIC {
            return Some(SourceFormat::Parquet);
        }

        if data[..4] == ZSTD_MAGIC {
            return Some(SourceFormat::Arrow);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("data/results.csv", Some(SourceFormat::Csv))]
    #[test_case("data/f1-results.parquet", Some(SourceFormat::Parquet))]
    #[test_case("data/f1-results.zstd.arrow", Some(SourceFormat::Arrow))]
    #[test_case("data/F1.ARROW", Some(SourceFormat::Arrow))]
    #[test_case("data/readme", None)]
    #[test_case("data/results.json", None)]
    fn test_source_from_path(path: &str, expected: Option<SourceFormat>) {
        assert_eq!(FileFormat::source_from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_sink_from_path() {
        assert_eq!(FileFormat::sink_from_path(Path::new("x.csv")), None);
        assert_eq!(
            FileFormat::sink_from_path(Path::new("x.zstd.arrow")),
            Some(SinkFormat::Arrow)
        );
    }

    #[test]
    fn test_source_from_content() {
        assert_eq!(FileFormat::source_from_content(b"PAR1...."), Some(SourceFormat::Parquet));
        assert_eq!(
            FileFormat::source_from_content(&[0x28, 0xB5, 0x2F, 0xFD, 0x00]),
            Some(SourceFormat::Arrow)
        );
        assert_eq!(FileFormat::source_from_content(b"id,"), None);
    }
}
