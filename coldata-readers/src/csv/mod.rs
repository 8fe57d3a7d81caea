//! CSV source reader
//!
//! This module decodes header-delimited CSV text into a typed [`Table`] in a
//! single pass, inferring one type per column from the cell text.
//!
//! [`Table`]: coldata_core::Table

mod parser;
mod reader;

pub use parser::CsvParser;
pub use reader::{read_csv_file, CsvReader, CsvReaderOptions};
