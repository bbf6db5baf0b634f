//! Configuration handling for csvcompare

use std::path::PathBuf;

use crate::model::KeyNormalization;

/// Default row count at which table 1 is matched in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 50_000;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Options consumed by the comparison engine
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Columns whose values identify a row on both sides
    pub identifier_columns: Vec<String>,
    /// Columns never compared
    pub exclusion_columns: Vec<String>,
    /// When non-empty, the only columns compared
    pub inclusion_columns: Vec<String>,
    /// Normalization applied to identifier values before matching
    pub key_normalization: KeyNormalization,
    /// Ignore case when comparing cell values
    pub ignore_case: bool,
    /// Ignore leading/trailing whitespace in cell values
    pub ignore_whitespace: bool,
    /// Table 1 row count at which matching runs in parallel (0 disables)
    pub parallel_threshold: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            identifier_columns: Vec::new(),
            exclusion_columns: Vec::new(),
            inclusion_columns: Vec::new(),
            key_normalization: KeyNormalization::default(),
            ignore_case: false,
            ignore_whitespace: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CompareOptions {
    /// Create options with the given identifier columns
    pub fn new<I, S>(identifier_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier_columns: identifier_columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set columns to leave out of the comparison
    pub fn with_exclusion_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the comparison to these columns
    pub fn with_inclusion_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusion_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set identifier normalization
    pub fn with_key_normalization(mut self, normalization: KeyNormalization) -> Self {
        self.key_normalization = normalization;
        self
    }

    /// Enable case-insensitive cell comparison
    pub fn with_ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    /// Enable whitespace-insensitive cell comparison
    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    /// Set the parallel matching threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// Configuration for a command-line comparison run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the first file
    pub file1: PathBuf,
    /// Path to the second file
    pub file2: PathBuf,
    /// Output format
    pub output_format: OutputFormat,
    /// Write output to this file instead of stdout
    pub output_path: Option<PathBuf>,
    /// Only show statistics, not detailed results
    pub stats_only: bool,
    /// Engine options
    pub compare: CompareOptions,
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(file1: PathBuf, file2: PathBuf) -> Self {
        Self {
            file1,
            file2,
            ..Default::default()
        }
    }

    /// Set engine options
    pub fn with_compare_options(mut self, options: CompareOptions) -> Self {
        self.compare = options;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set output destination
    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }

    /// Enable stats-only mode
    pub fn with_stats_only(mut self, stats_only: bool) -> Self {
        self.stats_only = stats_only;
        self
    }
}
