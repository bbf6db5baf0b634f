//! Error types for the comparison engine

use std::fmt;

use thiserror::Error;

use crate::model::RowKey;

/// Which input of a comparison an error or orphan belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    File1,
    File2,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::File1 => write!(f, "file 1"),
            Side::File2 => write!(f, "file 2"),
        }
    }
}

/// Invalid identifier or filter column specification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one identifier column is required")]
    EmptyIdentifier,
    #[error("identifier column '{column}' is missing from {side}")]
    MissingIdentifierColumn { column: String, side: Side },
    #[error("exclusion and inclusion columns cannot both be given")]
    ConflictingFilters,
    #[error("filter column '{0}' does not exist in either file")]
    UnknownFilterColumn(String),
}

/// Errors raised by a comparison run
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("duplicate identifier key [{key}] in {side} (lines {first_line} and {second_line})")]
    DuplicateKey {
        side: Side,
        key: RowKey,
        first_line: usize,
        second_line: usize,
    },
    #[error("comparison cancelled")]
    Cancelled,
    #[error("comparison task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = CompareError> = std::result::Result<T, E>;
