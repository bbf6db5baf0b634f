//! CSV file reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::model::{Schema, Table};

use super::{ReadError, TableReader};

/// Reader for delimited text files.
///
/// Values are kept verbatim as text. Every record must have as many fields
/// as the header.
#[derive(Debug, Clone, Copy)]
pub struct CsvReader {
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a table from any byte source
    pub fn read_from<R: Read>(&self, source: R) -> Result<Table, ReadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .delimiter(self.delimiter)
            .from_reader(source);

        let headers = csv_reader
            .headers()
            .map_err(|source| ReadError::Parse { line: 1, source })?
            .clone();

        let schema = Schema::new(headers.iter().map(str::to_string))?;
        let mut table = Table::new(schema);

        for result in csv_reader.records() {
            let record = result.map_err(|source| ReadError::Parse {
                line: source.position().map(|p| p.line()).unwrap_or(0),
                source,
            })?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            table.push_row(record.iter().map(str::to_string).collect(), line)?;
        }

        debug!(
            columns = table.column_count(),
            rows = table.row_count(),
            "read table"
        );
        Ok(table)
    }
}

impl TableReader for CsvReader {
    fn read(&self, path: &Path) -> Result<Table, ReadError> {
        let file = File::open(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_from(BufReader::new(file))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}
