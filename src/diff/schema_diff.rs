//! Column reconciliation: orphan columns and the set of compared columns

use rustc_hash::FxHashSet;

use crate::config::CompareOptions;
use crate::error::{ConfigError, Side};
use crate::model::{Schema, Table};

/// Which non-identifier columns take part in cell comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Every shared column
    All,
    /// Every shared column except these
    Exclude(FxHashSet<String>),
    /// Only these shared columns
    Include(FxHashSet<String>),
}

impl ColumnSelection {
    /// Build a selection from exclusion and inclusion lists.
    ///
    /// The two policies are mutually exclusive; giving both is an error.
    pub fn from_filters(exclusion: &[String], inclusion: &[String]) -> Result<Self, ConfigError> {
        match (exclusion.is_empty(), inclusion.is_empty()) {
            (true, true) => Ok(ColumnSelection::All),
            (false, true) => Ok(ColumnSelection::Exclude(exclusion.iter().cloned().collect())),
            (true, false) => Ok(ColumnSelection::Include(inclusion.iter().cloned().collect())),
            (false, false) => Err(ConfigError::ConflictingFilters),
        }
    }

    /// Whether a shared, non-identifier column is compared
    pub fn selects(&self, column: &str) -> bool {
        match self {
            ColumnSelection::All => true,
            ColumnSelection::Exclude(excluded) => !excluded.contains(column),
            ColumnSelection::Include(included) => included.contains(column),
        }
    }

    fn filter_columns(&self) -> impl Iterator<Item = &String> {
        let set = match self {
            ColumnSelection::All => None,
            ColumnSelection::Exclude(s) | ColumnSelection::Include(s) => Some(s),
        };
        set.into_iter().flatten()
    }
}

/// A column compared on matched rows, with its position on each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparedColumn {
    pub name: String,
    pub index1: usize,
    pub index2: usize,
}

/// Validated column layout for one comparison
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    /// Identifier column positions in table 1
    pub key_indices1: Vec<usize>,
    /// Identifier column positions in table 2
    pub key_indices2: Vec<usize>,
    /// Compared columns in table 1 order
    pub compared: Vec<ComparedColumn>,
    pub orphan_columns1: Vec<String>,
    pub orphan_columns2: Vec<String>,
}

impl ColumnPlan {
    /// Validate the options against both schemas and lay out the comparison.
    ///
    /// Runs before any row is read.
    pub fn resolve(
        table1: &Table,
        table2: &Table,
        options: &CompareOptions,
    ) -> Result<Self, ConfigError> {
        let identifiers = &options.identifier_columns;
        if identifiers.is_empty() {
            return Err(ConfigError::EmptyIdentifier);
        }

        let selection =
            ColumnSelection::from_filters(&options.exclusion_columns, &options.inclusion_columns)?;

        let key_indices1 = resolve_identifiers(table1.schema(), identifiers, Side::File1)?;
        let key_indices2 = resolve_identifiers(table2.schema(), identifiers, Side::File2)?;

        if let Some(unknown) = selection
            .filter_columns()
            .find(|c| !table1.has_column(c) && !table2.has_column(c))
        {
            return Err(ConfigError::UnknownFilterColumn(unknown.clone()));
        }

        let compared = table1
            .column_names()
            .enumerate()
            .filter(|(_, name)| !identifiers.iter().any(|id| id.as_str() == *name))
            .filter(|(_, name)| selection.selects(name))
            .filter_map(|(index1, name)| {
                table2.column_index(name).map(|index2| ComparedColumn {
                    name: name.to_string(),
                    index1,
                    index2,
                })
            })
            .collect();

        Ok(Self {
            key_indices1,
            key_indices2,
            compared,
            orphan_columns1: SchemaDiff::orphan_columns(table1.schema(), table2.schema()),
            orphan_columns2: SchemaDiff::orphan_columns(table2.schema(), table1.schema()),
        })
    }

    /// Names of the compared columns
    pub fn compared_names(&self) -> Vec<String> {
        self.compared.iter().map(|c| c.name.clone()).collect()
    }
}

fn resolve_identifiers(
    schema: &Schema,
    identifiers: &[String],
    side: Side,
) -> Result<Vec<usize>, ConfigError> {
    identifiers
        .iter()
        .map(|column| {
            schema
                .index_of(column)
                .ok_or_else(|| ConfigError::MissingIdentifierColumn {
                    column: column.clone(),
                    side,
                })
        })
        .collect()
}

/// Schema comparison
pub struct SchemaDiff;

impl SchemaDiff {
    /// Columns of `this` absent from `other`, in `this` header order
    pub fn orphan_columns(this: &Schema, other: &Schema) -> Vec<String> {
        this.names()
            .filter(|name| !other.contains(name))
            .map(str::to_string)
            .collect()
    }
}
