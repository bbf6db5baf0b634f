//! Colored terminal output

use std::path::Path;

use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::diff::ComparisonResult;
use crate::model::Table;

use super::{OutputFormatter, ReportError};

/// Terminal output with colored section headings
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_heading(
        &self,
        writer: &mut dyn WriteColor,
        text: &str,
        color: Color,
    ) -> Result<(), ReportError> {
        writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(writer, "{}", text)?;
        writer.reset()?;
        Ok(())
    }

    fn write_header(
        &self,
        writer: &mut dyn WriteColor,
        file1: &Path,
        file2: &Path,
    ) -> Result<(), ReportError> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            writer,
            " csvcompare: {} ↔ {}",
            file1.display(),
            file2.display()
        )?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_summary(
        &self,
        result: &ComparisonResult,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        let stats = result.stats();
        writeln!(
            writer,
            "Summary: {} matched ({} modified), {} cells differ, {} / {} extra rows (out of {} / {} rows)",
            stats.rows_matched,
            stats.rows_modified,
            stats.cells_changed,
            result.orphan_rows1().row_count(),
            result.orphan_rows2().row_count(),
            stats.rows1,
            stats.rows2
        )?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_orphan_columns(
        &self,
        label: &str,
        columns: &[String],
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        self.write_heading(writer, label, Color::Yellow)?;
        if columns.is_empty() {
            writeln!(writer, " None")?;
        } else {
            writeln!(writer, " {}", columns.join(", "))?;
        }
        Ok(())
    }

    fn write_differences(
        &self,
        result: &ComparisonResult,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        self.write_heading(writer, "Differences:", Color::Cyan)?;
        if !result.has_differences() {
            writeln!(writer, " None")?;
            return Ok(());
        }
        writeln!(writer)?;

        let mut builder = Builder::default();
        builder.push_record(
            result
                .identifier_columns()
                .iter()
                .cloned()
                .chain(["Column", "File 1 Value", "File 2 Value"].map(String::from)),
        );
        for diff in result.differences() {
            builder.push_record(
                diff.key.values().iter().cloned().chain([
                    diff.column.clone(),
                    diff.value1.clone(),
                    diff.value2.clone(),
                ]),
            );
        }
        writeln!(writer, "{}", render_grid(builder))?;
        Ok(())
    }

    fn write_orphan_rows(
        &self,
        label: &str,
        table: &Table,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        self.write_heading(writer, label, Color::Magenta)?;
        if table.is_empty() {
            writeln!(writer, " None")?;
            return Ok(());
        }
        writeln!(writer)?;

        let mut builder = Builder::default();
        builder.push_record(table.column_names().map(str::to_string));
        for row in table.rows() {
            builder.push_record(row.values().iter().cloned());
        }
        writeln!(writer, "{}", render_grid(builder))?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        result: &ComparisonResult,
        file1: &Path,
        file2: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError> {
        self.write_header(writer, file1, file2)?;

        if result.is_identical() {
            writeln!(writer, "No differences found.")?;
            return Ok(());
        }

        self.write_summary(result, writer)?;
        self.write_differences(result, writer)?;
        self.write_orphan_columns("File 1 Extra Columns:", result.orphan_columns1(), writer)?;
        self.write_orphan_columns("File 2 Extra Columns:", result.orphan_columns2(), writer)?;
        self.write_orphan_rows("File 1 Extra Rows:", result.orphan_rows1(), writer)?;
        self.write_orphan_rows("File 2 Extra Rows:", result.orphan_rows2(), writer)?;

        Ok(())
    }
}

fn render_grid(builder: Builder) -> String {
    let mut grid = builder.build();
    grid.with(Style::modern());
    grid.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;
    use crate::diff::compare_tables;
    use termcolor::NoColor;

    fn render(result: &ComparisonResult) -> String {
        let mut out = NoColor::new(Vec::new());
        TerminalOutput::new()
            .render(result, Path::new("before.csv"), Path::new("after.csv"), &mut out)
            .unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_identical_tables() {
        let t = Table::from_records(&["id"], [["1"]]).unwrap();
        let result = compare_tables(&t, &t, &CompareOptions::new(["id"])).unwrap();
        let text = render(&result);
        assert!(text.contains("before.csv ↔ after.csv"));
        assert!(text.contains("No differences found."));
    }

    #[test]
    fn test_sections_rendered() {
        let t1 = Table::from_records(&["id", "v"], [["1", "old"], ["2", "gone"]]).unwrap();
        let t2 = Table::from_records(&["id", "v", "note"], [["1", "new", "n"]]).unwrap();
        let result = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();
        let text = render(&result);

        assert!(text.contains("Differences:"));
        assert!(text.contains("old"));
        assert!(text.contains("new"));
        assert!(text.contains("File 1 Extra Columns: None"));
        assert!(text.contains("File 2 Extra Columns: note"));
        assert!(text.contains("gone"));
        assert!(text.contains("File 2 Extra Rows: None"));
    }
}
