//! JSON output format

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use termcolor::WriteColor;

use crate::diff::{ComparisonResult, ComparisonStats, Difference};
use crate::model::Table;

use super::{OutputFormatter, ReportError};

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonTable<'a> {
    columns: Vec<&'a str>,
    rows: Vec<IndexMap<&'a str, &'a str>>,
}

impl<'a> JsonTable<'a> {
    fn from_table(table: &'a Table) -> Self {
        let columns: Vec<&str> = table.column_names().collect();
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .copied()
                    .zip(row.values().iter().map(String::as_str))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file1: String,
    file2: String,
    generated_at: DateTime<Utc>,
    identifier_columns: &'a [String],
    compared_columns: &'a [String],
    differences: &'a [Difference],
    orphan_columns1: &'a [String],
    orphan_columns2: &'a [String],
    orphan_rows1: JsonTable<'a>,
    orphan_rows2: JsonTable<'a>,
    stats: &'a ComparisonStats,
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        result: &ComparisonResult,
        file1: &Path,
        file2: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        let report = JsonReport {
            file1: file1.display().to_string(),
            file2: file2.display().to_string(),
            generated_at: Utc::now(),
            identifier_columns: result.identifier_columns(),
            compared_columns: result.compared_columns(),
            differences: result.differences(),
            orphan_columns1: result.orphan_columns1(),
            orphan_columns2: result.orphan_columns2(),
            orphan_rows1: JsonTable::from_table(result.orphan_rows1()),
            orphan_rows2: JsonTable::from_table(result.orphan_rows2()),
            stats: result.stats(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &report)?;
        } else {
            serde_json::to_writer(&mut *writer, &report)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
