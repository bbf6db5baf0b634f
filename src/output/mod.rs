//! Output formatting for comparison results

mod csv;
mod json;
mod terminal;

use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::Path;

use termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use thiserror::Error;

use crate::config::OutputFormat;
use crate::diff::ComparisonResult;

pub use self::csv::{CsvOutput, CsvReport};
pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Errors raised while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a comparison result to a writer
    fn render(
        &self,
        result: &ComparisonResult,
        file1: &Path,
        file2: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<(), ReportError>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Csv => Box::new(CsvOutput),
        }
    }
}

/// Render a comparison result to stdout
pub fn render_to_stdout(
    result: &ComparisonResult,
    file1: &Path,
    file2: &Path,
    format: OutputFormat,
) -> Result<(), ReportError> {
    let formatter = OutputFactory::create(format);
    let choice = color_choice(format, std::io::stdout().is_terminal());
    let mut stdout = StandardStream::stdout(choice);
    formatter.render(result, file1, file2, &mut stdout)
}

/// Colors only for terminal output written to an interactive terminal.
///
/// termcolor's `Auto` consults `TERM`/`NO_COLOR` but not whether the stream
/// is a tty, so piped output must opt out explicitly.
fn color_choice(format: OutputFormat, is_terminal: bool) -> ColorChoice {
    match format {
        OutputFormat::Terminal if is_terminal => ColorChoice::Auto,
        _ => ColorChoice::Never,
    }
}

/// Render a comparison result to a file, without colors
pub fn render_to_path(
    result: &ComparisonResult,
    file1: &Path,
    file2: &Path,
    format: OutputFormat,
    destination: &Path,
) -> Result<(), ReportError> {
    if format == OutputFormat::Csv {
        return CsvReport::write_to_path(destination, result);
    }
    let formatter = OutputFactory::create(format);
    let mut writer = NoColor::new(BufWriter::new(File::create(destination)?));
    formatter.render(result, file1, file2, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piped_terminal_output_has_no_color() {
        assert_eq!(color_choice(OutputFormat::Terminal, false), ColorChoice::Never);
        assert_eq!(color_choice(OutputFormat::Terminal, true), ColorChoice::Auto);
    }

    #[test]
    fn test_machine_formats_never_colored() {
        for format in [OutputFormat::Json, OutputFormat::Csv] {
            assert_eq!(color_choice(format, true), ColorChoice::Never);
            assert_eq!(color_choice(format, false), ColorChoice::Never);
        }
    }
}
