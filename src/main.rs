//! csvcompare - Key-based comparison of two CSV datasets

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use csvcompare::config::{CompareOptions, Config, OutputFormat};
use csvcompare::model::{KeyNormalization, Table};
use csvcompare::output::{render_to_path, render_to_stdout};
use csvcompare::parser::read_table;
use csvcompare::runner::compare_async;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Csv,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Csv => OutputFormat::Csv,
        }
    }
}

/// Compare two CSV files row by row, matching rows by identifier columns
#[derive(Parser, Debug)]
#[command(name = "csvcompare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First file to compare
    file1: PathBuf,

    /// Second file to compare
    file2: PathBuf,

    /// Identifier column(s) used to match rows (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    key: Vec<String>,

    /// Column(s) to leave out of the comparison (comma-separated)
    #[arg(short, long, value_delimiter = ',', conflicts_with = "include")]
    exclude: Vec<String>,

    /// Only compare these column(s) (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    include: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Match identifier values verbatim instead of trimming whitespace
    #[arg(long)]
    exact_keys: bool,

    /// Ignore case when comparing cell values
    #[arg(long)]
    ignore_case: bool,

    /// Ignore leading/trailing whitespace in cell values
    #[arg(long)]
    ignore_whitespace: bool,

    /// Row count of file 1 at which matching runs in parallel (0 disables)
    #[arg(long, default_value_t = csvcompare::config::DEFAULT_PARALLEL_THRESHOLD)]
    parallel_threshold: usize,

    /// Only show statistics, not detailed results
    #[arg(long)]
    stats_only: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(disagree) => {
            if disagree {
                ExitCode::from(1) // Differences found
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<bool> {
    let key_normalization = if cli.exact_keys {
        KeyNormalization::Exact
    } else {
        KeyNormalization::Trim
    };

    let options = CompareOptions::new(cli.key)
        .with_exclusion_columns(cli.exclude)
        .with_inclusion_columns(cli.include)
        .with_key_normalization(key_normalization)
        .with_ignore_case(cli.ignore_case)
        .with_ignore_whitespace(cli.ignore_whitespace)
        .with_parallel_threshold(cli.parallel_threshold);

    let mut config = Config::new(cli.file1, cli.file2)
        .with_compare_options(options)
        .with_output_format(cli.format.into())
        .with_stats_only(cli.stats_only);
    if let Some(path) = cli.output {
        config = config.with_output_path(path);
    }

    let table1 = load(&config.file1).await?;
    let table2 = load(&config.file2).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling comparison");
            on_interrupt.cancel();
        }
    });

    let result = compare_async(table1, table2, config.compare.clone(), cancel)
        .await
        .context("Comparison failed")?;
    let disagree = !result.is_identical();

    if config.stats_only {
        let stats = result.stats();
        println!("File 1: {} ({} rows)", config.file1.display(), stats.rows1);
        println!("File 2: {} ({} rows)", config.file2.display(), stats.rows2);
        println!();
        println!("Matched:        {}", stats.rows_matched);
        println!("Modified:       {}", stats.rows_modified);
        println!("Unchanged:      {}", stats.rows_unchanged);
        println!("Cells changed:  {}", stats.cells_changed);
        println!("File 1 extra rows:    {}", result.orphan_rows1().row_count());
        println!("File 2 extra rows:    {}", result.orphan_rows2().row_count());
        println!("File 1 extra columns: {}", result.orphan_columns1().len());
        println!("File 2 extra columns: {}", result.orphan_columns2().len());
        return Ok(disagree);
    }

    match &config.output_path {
        Some(destination) => render_to_path(
            &result,
            &config.file1,
            &config.file2,
            config.output_format,
            destination,
        )
        .with_context(|| format!("Failed to write report: {}", destination.display()))?,
        None => render_to_stdout(&result, &config.file1, &config.file2, config.output_format)?,
    }

    Ok(disagree)
}

async fn load(path: &Path) -> Result<Arc<Table>> {
    let owned = path.to_path_buf();
    let table = tokio::task::spawn_blocking(move || read_table(&owned))
        .await?
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(Arc::new(table))
}
