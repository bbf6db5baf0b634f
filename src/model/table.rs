//! Table and Row data structures

use std::sync::Arc;

use thiserror::Error;

use super::schema::Schema;

/// Violations of a table's fixed schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("row at line {line} has {found} values, expected {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A row of text values addressed by its table's schema
#[derive(Debug, Clone)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<String>,
    /// Original line number in the source file (1-indexed, header is line 1)
    pub source_line: usize,
}

impl Row {
    /// Value of a column by name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema
            .index_of(column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Value at a column position
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Values in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Schema of the table this row was read into
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

/// A table with a fixed schema and ordered rows
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    pub fn new(schema: Schema) -> Self {
        Self::with_schema(Arc::new(schema))
    }

    /// Create an empty table sharing an existing schema
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal column names and records
    pub fn from_records<S, R, V>(columns: &[S], records: R) -> Result<Self, TableError>
    where
        S: AsRef<str>,
        R: IntoIterator<Item = V>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let schema = Schema::new(columns.iter().map(|c| c.as_ref().to_string()))?;
        let mut table = Self::new(schema);
        for (i, record) in records.into_iter().enumerate() {
            table.push_row(record.into_iter().map(Into::into).collect(), i + 2)?;
        }
        Ok(table)
    }

    /// Materialize rows of another table into a standalone table.
    ///
    /// Rows must all share `schema`; the new table keeps the source column order.
    pub fn from_rows<I>(schema: Arc<Schema>, rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        let rows: Vec<Row> = rows.into_iter().collect();
        debug_assert!(rows.iter().all(|r| Arc::ptr_eq(&r.schema, &schema)));
        Self { schema, rows }
    }

    /// Append a row, validating its width against the schema
    pub fn push_row(&mut self, values: Vec<String>, source_line: usize) -> Result<(), TableError> {
        if values.len() != self.schema.len() {
            return Err(TableError::RowWidth {
                line: source_line,
                expected: self.schema.len(),
                found: values.len(),
            });
        }
        self.rows.push(Row {
            schema: Arc::clone(&self.schema),
            values,
            source_line,
        });
        Ok(())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column names in header order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.schema.names()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_records(&["id", "name"], [["1", "alice"], ["2", "bob"]]).unwrap()
    }

    #[test]
    fn test_rows_address_values_by_name() {
        let table = sample();
        let row = &table.rows()[1];
        assert_eq!(row.get("name"), Some("bob"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.source_line, 3);
        assert!(Arc::ptr_eq(row.schema(), table.schema()));
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = sample();
        let err = table.push_row(vec!["3".into()], 4).unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidth {
                line: 4,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_from_rows_keeps_source_column_order() {
        let table = Table::from_records(&["z", "a", "m"], [["1", "2", "3"]]).unwrap();
        let copy = Table::from_rows(Arc::clone(table.schema()), table.rows().iter().cloned());
        drop(table);
        assert_eq!(copy.column_names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(copy.rows()[0].get("m"), Some("3"));
    }
}
