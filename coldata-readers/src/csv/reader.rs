//! CSV reader implementation

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use coldata_core::Table;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};

use super::parser::CsvParser;

/// Options for CSV reader
#[derive(Debug, Clone)]
pub struct CsvReaderOptions {
    /// Whether the CSV has a header row
    pub has_header: bool,

    /// Delimiter character
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Whether to trim whitespace around fields
    pub trim: bool,

    /// Cell contents that read as null
    pub null_values: Vec<String>,
}

impl Default for CsvReaderOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            trim: false,
            null_values: vec![String::new()],
        }
    }
}

/// CSV reader decoding a byte stream into a [`Table`]
pub struct CsvReader<R: Read> {
    /// Inner CSV reader
    reader: csv::Reader<R>,

    /// Cell parser
    parser: CsvParser,

    /// Reader options
    options: CsvReaderOptions,
}

impl<R: Read> CsvReader<R> {
    /// Create a new CSV reader over a byte stream
    pub fn new(reader: R, options: CsvReaderOptions) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(false)
            .trim(if options.trim { Trim::All } else { Trim::None })
            .from_reader(reader);

        let parser = CsvParser::new(options.null_values.clone());

        Self {
            reader,
            parser,
            options,
        }
    }

    /// Decode the whole stream in a single pass.
    ///
    /// The first record names the columns. Every later record must have the
    /// same number of fields; a malformed record fails the whole read.
    pub fn read_table(mut self) -> Result<Table> {
        if !self.options.has_header {
            return Err(Error::Unsupported(
                "CSV input without a header row".into(),
            ));
        }

        let header = self.reader.headers()?.clone();
        let names = column_names(&header)?;

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        let mut record = StringRecord::new();
        let mut num_rows = 0usize;

        while self.reader.read_record(&mut record)? {
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
            num_rows += 1;
        }

        debug!(columns = names.len(), rows = num_rows, "decoded CSV records");

        let columns = names
            .iter()
            .zip(cells)
            .map(|(name, cells)| self.parser.parse_column(name, cells))
            .collect();

        Ok(Table::with_row_count(columns, num_rows)?)
    }
}

fn column_names(header: &StringRecord) -> Result<Vec<String>> {
    let mut seen = HashSet::with_capacity(header.len());
    let mut names = Vec::with_capacity(header.len());

    for name in header {
        if !seen.insert(name) {
            return Err(Error::Schema(format!("duplicate CSV header '{name}'")));
        }
        names.push(name.to_string());
    }

    Ok(names)
}

/// Open `path` and decode it as CSV.
///
/// A missing file fails here, before any decoding starts.
pub fn read_csv_file<P: AsRef<Path>>(path: P, options: CsvReaderOptions) -> Result<Table> {
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "reading CSV");
    CsvReader::new(file, options).read_table()
}
