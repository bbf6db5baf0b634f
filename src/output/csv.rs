//! CSV report writer
//!
//! Every record starts with a record-type field, so column names or cell
//! values can never be mistaken for section boundaries:
//!
//! ```text
//! section,Differences
//! header,id,Column,File 1 Value,File 2 Value
//! row,1,b,9,10
//! section,File 1 Extra Columns
//! section,File 2 Extra Columns
//! row,c
//! section,File 1 Extra Rows
//! header,id,a,b
//! row,2,1,1
//! section,File 2 Extra Rows
//! ```
//!
//! Empty sections carry only their `section` record. Extra-column sections
//! hold one `row` per column name. Extra-row sections use the original
//! column order of the file they came from.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use termcolor::WriteColor;

use crate::diff::ComparisonResult;
use crate::model::Table;

use super::{OutputFormatter, ReportError};

pub const SECTION_RECORD: &str = "section";
pub const HEADER_RECORD: &str = "header";
pub const ROW_RECORD: &str = "row";

pub const DIFFERENCES_SECTION: &str = "Differences";
pub const ORPHAN_COLUMNS1_SECTION: &str = "File 1 Extra Columns";
pub const ORPHAN_COLUMNS2_SECTION: &str = "File 2 Extra Columns";
pub const ORPHAN_ROWS1_SECTION: &str = "File 1 Extra Rows";
pub const ORPHAN_ROWS2_SECTION: &str = "File 2 Extra Rows";

/// Serializes a comparison result as a CSV report
pub struct CsvReport;

impl CsvReport {
    /// Write the report to any byte sink
    pub fn write<W: Write>(writer: W, result: &ComparisonResult) -> Result<(), ReportError> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        wtr.write_record([SECTION_RECORD, DIFFERENCES_SECTION])?;
        if result.has_differences() {
            let header = std::iter::once(HEADER_RECORD)
                .chain(result.identifier_columns().iter().map(String::as_str))
                .chain(["Column", "File 1 Value", "File 2 Value"]);
            wtr.write_record(header)?;
            for diff in result.differences() {
                let record = std::iter::once(ROW_RECORD)
                    .chain(diff.key.values().iter().map(String::as_str))
                    .chain([
                        diff.column.as_str(),
                        diff.value1.as_str(),
                        diff.value2.as_str(),
                    ]);
                wtr.write_record(record)?;
            }
        }

        write_columns(&mut wtr, ORPHAN_COLUMNS1_SECTION, result.orphan_columns1())?;
        write_columns(&mut wtr, ORPHAN_COLUMNS2_SECTION, result.orphan_columns2())?;
        write_rows(&mut wtr, ORPHAN_ROWS1_SECTION, result.orphan_rows1())?;
        write_rows(&mut wtr, ORPHAN_ROWS2_SECTION, result.orphan_rows2())?;

        wtr.flush()?;
        Ok(())
    }

    /// Write the report to a file
    pub fn write_to_path(path: &Path, result: &ComparisonResult) -> Result<(), ReportError> {
        let file = File::create(path)?;
        Self::write(BufWriter::new(file), result)
    }
}

fn write_columns<W: Write>(
    wtr: &mut csv::Writer<W>,
    section: &str,
    columns: &[String],
) -> Result<(), ReportError> {
    wtr.write_record([SECTION_RECORD, section])?;
    for column in columns {
        wtr.write_record([ROW_RECORD, column.as_str()])?;
    }
    Ok(())
}

fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    section: &str,
    table: &Table,
) -> Result<(), ReportError> {
    wtr.write_record([SECTION_RECORD, section])?;
    if table.is_empty() {
        return Ok(());
    }
    wtr.write_record(std::iter::once(HEADER_RECORD).chain(table.column_names()))?;
    for row in table.rows() {
        wtr.write_record(std::iter::once(ROW_RECORD).chain(row.values().iter().map(String::as_str)))?;
    }
    Ok(())
}

/// CSV report as an output format
pub struct CsvOutput;

impl OutputFormatter for CsvOutput {
    fn render(
        &self,
        result: &ComparisonResult,
        _file1: &Path,
        _file2: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        CsvReport::write(writer, result)
    }
}
