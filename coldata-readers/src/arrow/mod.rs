//! Arrow IPC source reader and sink writer
//!
//! Output is an Arrow IPC *file* whose whole buffer is zstd-compressed, the
//! `.zstd.arrow` artifacts of the pipeline. Readers decompress before decoding.

mod convert;
mod reader;
mod writer;

pub use convert::{
    array_to_values, arrow_type, column_to_array, record_batches_to_table, table_schema,
    table_to_record_batch, table_type,
};
pub use reader::{decode_ipc, read_arrow_file, ArrowReader, ArrowReaderOptions};
pub use writer::{
    compress, decompress, encode_ipc, ArrowWriter, ArrowWriterOptions, DEFAULT_COMPRESSION_LEVEL,
};
