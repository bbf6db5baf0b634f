//! Comparison result value

use serde::Serialize;

use crate::model::{RowKey, Table};

/// A single cell whose value differs between matched rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    /// Identifier values of the matched row pair
    pub key: RowKey,
    /// Column name
    pub column: String,
    /// Value in file 1
    pub value1: String,
    /// Value in file 2
    pub value2: String,
}

/// Statistics about the comparison
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonStats {
    pub rows1: usize,
    pub rows2: usize,
    pub rows_matched: usize,
    pub rows_modified: usize,
    pub rows_unchanged: usize,
    pub cells_changed: usize,
}

/// Result of comparing two tables.
///
/// Built once by the engine and never mutated afterwards. Orphan rows are
/// standalone tables sharing their source schema, so they outlive the inputs.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    identifier_columns: Vec<String>,
    compared_columns: Vec<String>,
    differences: Vec<Difference>,
    orphan_columns1: Vec<String>,
    orphan_columns2: Vec<String>,
    orphan_rows1: Table,
    orphan_rows2: Table,
    stats: ComparisonStats,
}

/// Parts of a result assembled by the engine
pub(crate) struct ResultParts {
    pub identifier_columns: Vec<String>,
    pub compared_columns: Vec<String>,
    pub differences: Vec<Difference>,
    pub orphan_columns1: Vec<String>,
    pub orphan_columns2: Vec<String>,
    pub orphan_rows1: Table,
    pub orphan_rows2: Table,
    pub stats: ComparisonStats,
}

impl ComparisonResult {
    pub(crate) fn from_parts(parts: ResultParts) -> Self {
        Self {
            identifier_columns: parts.identifier_columns,
            compared_columns: parts.compared_columns,
            differences: parts.differences,
            orphan_columns1: parts.orphan_columns1,
            orphan_columns2: parts.orphan_columns2,
            orphan_rows1: parts.orphan_rows1,
            orphan_rows2: parts.orphan_rows2,
            stats: parts.stats,
        }
    }

    pub fn identifier_columns(&self) -> &[String] {
        &self.identifier_columns
    }

    /// Columns that were compared on matched rows, in file 1 order
    pub fn compared_columns(&self) -> &[String] {
        &self.compared_columns
    }

    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// Columns of file 1 absent from file 2
    pub fn orphan_columns1(&self) -> &[String] {
        &self.orphan_columns1
    }

    /// Columns of file 2 absent from file 1
    pub fn orphan_columns2(&self) -> &[String] {
        &self.orphan_columns2
    }

    /// Rows of file 1 with no counterpart in file 2
    pub fn orphan_rows1(&self) -> &Table {
        &self.orphan_rows1
    }

    /// Rows of file 2 with no counterpart in file 1
    pub fn orphan_rows2(&self) -> &Table {
        &self.orphan_rows2
    }

    pub fn stats(&self) -> &ComparisonStats {
        &self.stats
    }

    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    pub fn has_orphan_columns(&self) -> bool {
        !self.orphan_columns1.is_empty() || !self.orphan_columns2.is_empty()
    }

    pub fn has_orphan_rows(&self) -> bool {
        !self.orphan_rows1.is_empty() || !self.orphan_rows2.is_empty()
    }

    /// True when the two files agree on every compared column and row
    pub fn is_identical(&self) -> bool {
        !self.has_differences() && !self.has_orphan_columns() && !self.has_orphan_rows()
    }
}
