//! Column schema shared by a table and its rows

use indexmap::IndexSet;

use super::TableError;

/// Ordered, unique column names of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: IndexSet<String>,
}

impl Schema {
    /// Create a schema, rejecting duplicate column names
    pub fn new<I, S>(names: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = IndexSet::new();
        for name in names {
            let name = name.into();
            if columns.contains(&name) {
                return Err(TableError::DuplicateColumn(name));
            }
            columns.insert(name);
        }
        Ok(Self { columns })
    }

    /// Position of a column by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Column name at a position
    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get_index(index).map(String::as_str)
    }

    /// Column names in header order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_header_order() {
        let schema = Schema::new(["id", "b", "a"]).unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["id", "b", "a"]);
        assert_eq!(schema.index_of("a"), Some(2));
        assert_eq!(schema.name(1), Some("b"));
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = Schema::new(["id", "name", "id"]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(ref c) if c == "id"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let schema = Schema::new(["Name", "name"]).unwrap();
        assert_eq!(schema.len(), 2);
        assert!(!schema.contains("NAME"));
    }
}
