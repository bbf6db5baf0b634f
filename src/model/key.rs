//! Identifier key handling

use std::fmt;

use serde::Serialize;

use super::table::Row;

/// How identifier values are normalized before rows are matched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyNormalization {
    /// Strip leading and trailing whitespace
    #[default]
    Trim,
    /// Use values verbatim
    Exact,
}

/// Ordered tuple of identifier values for one row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowKey(Vec<String>);

impl RowKey {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("|"))
    }
}

/// Builds row keys from resolved identifier column positions.
///
/// The positions are specific to one table's schema, so each side of a
/// comparison gets its own builder.
pub struct KeyBuilder {
    column_indices: Vec<usize>,
    normalization: KeyNormalization,
}

impl KeyBuilder {
    pub fn new(column_indices: Vec<usize>, normalization: KeyNormalization) -> Self {
        Self {
            column_indices,
            normalization,
        }
    }

    /// Build the key for a row of the table these positions were resolved against
    pub fn build_key(&self, row: &Row) -> RowKey {
        let values = self
            .column_indices
            .iter()
            .map(|&i| {
                let raw = row.get_index(i).unwrap_or_default();
                match self.normalization {
                    KeyNormalization::Trim => raw.trim().to_string(),
                    KeyNormalization::Exact => raw.to_string(),
                }
            })
            .collect();
        RowKey(values)
    }
}
