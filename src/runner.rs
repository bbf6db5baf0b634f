//! Asynchronous, cancellable entry point to the comparison engine
//!
//! The whole comparison runs on tokio's blocking pool; the caller's task only
//! awaits the result. Cancellation is cooperative and observed between row
//! batches.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::CompareOptions;
use crate::diff::{CompareEngine, ComparisonResult};
use crate::error::Result;
use crate::model::Table;

/// Compare two shared tables without blocking the calling task
pub async fn compare_async(
    table1: Arc<Table>,
    table2: Arc<Table>,
    options: CompareOptions,
    cancel: CancellationToken,
) -> Result<ComparisonResult> {
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        CompareEngine::new(options).compare_with_cancel(&table1, &table2, &cancel)
    })
    .await??;

    let stats = result.stats();
    info!(
        rows1 = stats.rows1,
        rows2 = stats.rows2,
        differences = result.differences().len(),
        orphan_rows1 = result.orphan_rows1().row_count(),
        orphan_rows2 = result.orphan_rows2().row_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "comparison complete"
    );
    Ok(result)
}
