//! Reading delimited text files into tables

mod csv;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::{Table, TableError};

pub use self::csv::CsvReader;

/// Errors raised while reading a table
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ::csv::Error,
    },
    #[error(transparent)]
    Schema(#[from] TableError),
}

/// Trait for reading tabular data files
pub trait TableReader: Send + Sync {
    /// Read a file into a Table
    fn read(&self, path: &Path) -> Result<Table, ReadError>;

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Read a CSV or TSV file, choosing the delimiter from its extension
pub fn read_table(path: &Path) -> Result<Table, ReadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let reader = if ext == "tsv" {
        CsvReader::new().with_delimiter(b'\t')
    } else {
        CsvReader::new()
    };
    if !reader.supports_extension(&ext) {
        debug!(extension = %ext, "unrecognized extension, reading as CSV");
    }
    reader.read(path)
}
