//! Compressed Arrow IPC reader implementation

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use arrow::ipc::reader::FileReader;
use arrow::record_batch::RecordBatch;
use tracing::debug;

use coldata_core::Table;

use crate::error::Result;

use super::convert::record_batches_to_table;
use super::writer::decompress;

/// Options for Arrow reader
#[derive(Debug, Clone)]
pub struct ArrowReaderOptions {
    /// Whether the input is zstd-compressed as written by [`super::ArrowWriter`]
    pub compressed: bool,
}

impl Default for ArrowReaderOptions {
    fn default() -> Self {
        Self { compressed: true }
    }
}

/// Arrow reader decoding (compressed) Arrow IPC files into a [`Table`]
#[derive(Debug, Clone, Default)]
pub struct ArrowReader {
    /// Options for reading
    options: ArrowReaderOptions,
}

impl ArrowReader {
    /// Create a new Arrow reader
    pub fn new(options: ArrowReaderOptions) -> Self {
        Self { options }
    }

    /// Read all of `reader`, decompress it and decode the IPC payload
    pub fn read_table<R: Read>(&self, mut reader: R) -> Result<Table> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.read_buffer(&buffer)
    }

    /// Decode an in-memory buffer
    pub fn read_buffer(&self, buffer: &[u8]) -> Result<Table> {
        if self.options.compressed {
            let ipc = decompress(buffer)?;
            debug!(
                compressed_bytes = buffer.len(),
                ipc_bytes = ipc.len(),
                "decompressed Arrow buffer"
            );
            decode_ipc(&ipc)
        } else {
            decode_ipc(buffer)
        }
    }
}

/// Decode an uncompressed Arrow IPC file buffer
pub fn decode_ipc(data: &[u8]) -> Result<Table> {
    let reader = FileReader::try_new(Cursor::new(data), None)?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, _>>()?;
    record_batches_to_table(&schema, &batches)
}

/// Open `path` and decode it as a compressed Arrow file
pub fn read_arrow_file<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "reading Arrow");
    ArrowReader::default().read_table(file)
}
