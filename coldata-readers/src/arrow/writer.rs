//! Compressed Arrow IPC writer implementation

use std::fs;
use std::path::Path;

use arrow::ipc::writer::FileWriter;
use tracing::debug;

use coldata_core::Table;

use crate::error::{Error, Result};

use super::convert::table_to_record_batch;

/// Default zstd level for Arrow output
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 5;

/// Options for Arrow writer
#[derive(Debug, Clone)]
pub struct ArrowWriterOptions {
    /// zstd level applied to the whole IPC buffer
    pub compression_level: i32,
}

impl Default for ArrowWriterOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Arrow writer producing zstd-compressed Arrow IPC files
#[derive(Debug, Clone)]
pub struct ArrowWriter {
    /// Writer options
    options: ArrowWriterOptions,
}

impl Default for ArrowWriter {
    fn default() -> Self {
        Self {
            options: ArrowWriterOptions::default(),
        }
    }
}

impl ArrowWriter {
    /// Create a new Arrow writer
    pub fn new(options: ArrowWriterOptions) -> Result<Self> {
        let range = zstd::compression_level_range();
        if !range.contains(&options.compression_level) {
            return Err(Error::Compression(format!(
                "zstd level {} outside {}..={}",
                options.compression_level,
                range.start(),
                range.end()
            )));
        }

        Ok(Self { options })
    }

    /// Get the writer options
    pub fn options(&self) -> &ArrowWriterOptions {
        &self.options
    }

    /// Encode the table and compress the resulting IPC file buffer
    pub fn write_buffer(&self, table: &Table) -> Result<Vec<u8>> {
        let ipc = encode_ipc(table)?;
        let compressed = compress(&ipc, self.options.compression_level)?;

        debug!(
            ipc_bytes = ipc.len(),
            compressed_bytes = compressed.len(),
            level = self.options.compression_level,
            "encoded Arrow buffer"
        );

        Ok(compressed)
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

/// Encode a table as an Arrow IPC file (uncompressed)
pub fn encode_ipc(table: &Table) -> Result<Vec<u8>> {
    let batch = table_to_record_batch(table)?;
    let mut buffer = Vec::new();

    {
        let mut writer = FileWriter::try_new(&mut buffer, &batch.schema())?;
        writer.write(&batch)?;
        writer.finish()?;
    }

    Ok(buffer)
}

/// Compress a buffer with zstd at `level`
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    zstd::encode_all(data, level).map_err(|e| Error::Compression(e.to_string()))
}

/// Decompress a zstd buffer
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data).map_err(|e| Error::Compression(e.to_string()))
}
