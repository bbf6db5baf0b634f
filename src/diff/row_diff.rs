//! Row matching algorithm

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use crate::error::{CompareError, Result, Side};
use crate::model::{KeyBuilder, Row, RowKey, Table};

use super::cell_diff::CellComparator;
use super::result::Difference;
use super::schema_diff::ComparedColumn;

/// Rows processed between cancellation checks
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Compute the key of every row, in row order
pub(crate) fn build_keys(
    table: &Table,
    builder: &KeyBuilder,
    cancel: &CancellationToken,
) -> Result<Vec<RowKey>> {
    let mut keys = Vec::with_capacity(table.row_count());
    for chunk in table.rows().chunks(CANCEL_CHECK_INTERVAL) {
        check_cancelled(cancel)?;
        keys.extend(chunk.iter().map(|row| builder.build_key(row)));
    }
    Ok(keys)
}

/// Index from row key to row position, rejecting duplicate keys
pub(crate) struct RowIndex {
    positions: FxHashMap<RowKey, usize>,
}

impl RowIndex {
    pub fn build(table: &Table, keys: Vec<RowKey>, side: Side) -> Result<Self> {
        let mut positions: FxHashMap<RowKey, usize> =
            FxHashMap::with_capacity_and_hasher(keys.len(), Default::default());
        for (idx, key) in keys.into_iter().enumerate() {
            if let Some(&first) = positions.get(&key) {
                let rows = table.rows();
                return Err(CompareError::DuplicateKey {
                    side,
                    key,
                    first_line: rows[first].source_line,
                    second_line: rows[idx].source_line,
                });
            }
            positions.insert(key, idx);
        }
        Ok(Self { positions })
    }

    pub fn get(&self, key: &RowKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

/// Reject keys that occur more than once on one side
pub(crate) fn ensure_unique_keys(table: &Table, keys: &[RowKey], side: Side) -> Result<()> {
    let mut seen: FxHashMap<&RowKey, usize> =
        FxHashMap::with_capacity_and_hasher(keys.len(), Default::default());
    for (idx, key) in keys.iter().enumerate() {
        if let Some(first) = seen.insert(key, idx) {
            let rows = table.rows();
            return Err(CompareError::DuplicateKey {
                side,
                key: key.clone(),
                first_line: rows[first].source_line,
                second_line: rows[idx].source_line,
            });
        }
    }
    Ok(())
}

/// Row positions and cell differences accumulated by a matching pass
#[derive(Debug, Default)]
pub(crate) struct MatchOutcome {
    pub differences: Vec<Difference>,
    /// Positions in table 1 with no match, in table 1 order
    pub unmatched1: Vec<usize>,
    /// Positions in table 2 never matched, in table 2 order
    pub unmatched2: Vec<usize>,
    pub rows_matched: usize,
    pub rows_modified: usize,
}

impl MatchOutcome {
    fn merge(&mut self, other: MatchOutcome) {
        self.differences.extend(other.differences);
        self.unmatched1.extend(other.unmatched1);
        self.rows_matched += other.rows_matched;
        self.rows_modified += other.rows_modified;
    }
}

/// Matches table 1 rows against an index over table 2
pub(crate) struct RowMatcher<'a> {
    compared: &'a [ComparedColumn],
    comparator: CellComparator,
}

impl<'a> RowMatcher<'a> {
    pub fn new(compared: &'a [ComparedColumn], comparator: CellComparator) -> Self {
        Self {
            compared,
            comparator,
        }
    }

    /// Consume matches from the index one row at a time
    pub fn match_sequential(
        &self,
        table1: &Table,
        keys1: &[RowKey],
        table2: &Table,
        index: RowIndex,
        cancel: &CancellationToken,
    ) -> Result<MatchOutcome> {
        let mut remaining = index.positions;
        let mut outcome = MatchOutcome::default();

        for (chunk_no, chunk) in table1.rows().chunks(CANCEL_CHECK_INTERVAL).enumerate() {
            check_cancelled(cancel)?;
            let offset = chunk_no * CANCEL_CHECK_INTERVAL;
            for (i, row1) in chunk.iter().enumerate() {
                let key = &keys1[offset + i];
                match remaining.remove(key) {
                    Some(idx2) => {
                        self.record_match(key, row1, &table2.rows()[idx2], &mut outcome);
                    }
                    None => outcome.unmatched1.push(offset + i),
                }
            }
        }

        let mut unmatched2: Vec<usize> = remaining.into_values().collect();
        unmatched2.sort_unstable();
        outcome.unmatched2 = unmatched2;
        Ok(outcome)
    }

    /// Match disjoint chunks of table 1 in parallel against a read-only index.
    ///
    /// Matches are marked in a visited set; unvisited table 2 rows are unmatched.
    pub fn match_parallel(
        &self,
        table1: &Table,
        keys1: &[RowKey],
        table2: &Table,
        index: &RowIndex,
        cancel: &CancellationToken,
    ) -> Result<MatchOutcome> {
        let visited: Vec<AtomicBool> = (0..table2.row_count())
            .map(|_| AtomicBool::new(false))
            .collect();

        let partials = table1
            .rows()
            .par_chunks(CANCEL_CHECK_INTERVAL)
            .zip(keys1.par_chunks(CANCEL_CHECK_INTERVAL))
            .enumerate()
            .map(|(chunk_no, (rows, keys))| {
                check_cancelled(cancel)?;
                let offset = chunk_no * CANCEL_CHECK_INTERVAL;
                let mut partial = MatchOutcome::default();
                for (i, (row1, key)) in rows.iter().zip(keys).enumerate() {
                    match index.get(key) {
                        Some(idx2) => {
                            visited[idx2].store(true, Ordering::Relaxed);
                            self.record_match(key, row1, &table2.rows()[idx2], &mut partial);
                        }
                        None => partial.unmatched1.push(offset + i),
                    }
                }
                Ok(partial)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut outcome = MatchOutcome::default();
        for partial in partials {
            outcome.merge(partial);
        }
        outcome.unmatched2 = visited
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.load(Ordering::Relaxed))
            .map(|(idx, _)| idx)
            .collect();
        Ok(outcome)
    }

    fn record_match(&self, key: &RowKey, row1: &Row, row2: &Row, outcome: &mut MatchOutcome) {
        outcome.rows_matched += 1;
        let before = outcome.differences.len();

        for column in self.compared {
            let value1 = row1.get_index(column.index1).unwrap_or_default();
            let value2 = row2.get_index(column.index2).unwrap_or_default();
            if !self.comparator.equal(value1, value2) {
                outcome.differences.push(Difference {
                    key: key.clone(),
                    column: column.name.clone(),
                    value1: value1.to_string(),
                    value2: value2.to_string(),
                });
            }
        }

        if outcome.differences.len() > before {
            outcome.rows_modified += 1;
        }
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(CompareError::Cancelled)
    } else {
        Ok(())
    }
}
