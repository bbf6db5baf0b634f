//! Comparison engine for matching rows and diffing cells

pub mod cell_diff;
mod result;
mod row_diff;
mod schema_diff;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::CompareOptions;
use crate::error::{Result, Side};
use crate::model::{KeyBuilder, Table};

pub use cell_diff::CellComparator;
pub use result::{ComparisonResult, ComparisonStats, Difference};
pub use row_diff::CANCEL_CHECK_INTERVAL;
pub use schema_diff::{ColumnPlan, ColumnSelection, ComparedColumn, SchemaDiff};

use result::ResultParts;
use row_diff::{build_keys, ensure_unique_keys, RowIndex, RowMatcher};

/// Main comparison engine
pub struct CompareEngine {
    options: CompareOptions,
    cell_comparator: CellComparator,
}

impl CompareEngine {
    /// Create a new engine with options
    pub fn new(options: CompareOptions) -> Self {
        let cell_comparator = CellComparator::new(options.ignore_case, options.ignore_whitespace);
        Self {
            options,
            cell_comparator,
        }
    }

    /// Compare two tables
    pub fn compare(&self, table1: &Table, table2: &Table) -> Result<ComparisonResult> {
        self.compare_with_cancel(table1, table2, &CancellationToken::new())
    }

    /// Compare two tables, checking `cancel` between row batches
    pub fn compare_with_cancel(
        &self,
        table1: &Table,
        table2: &Table,
        cancel: &CancellationToken,
    ) -> Result<ComparisonResult> {
        let plan = ColumnPlan::resolve(table1, table2, &self.options)?;
        debug!(
            compared = plan.compared.len(),
            orphan_columns1 = plan.orphan_columns1.len(),
            orphan_columns2 = plan.orphan_columns2.len(),
            "resolved column plan"
        );

        let normalization = self.options.key_normalization;
        let builder1 = KeyBuilder::new(plan.key_indices1.clone(), normalization);
        let builder2 = KeyBuilder::new(plan.key_indices2.clone(), normalization);

        let keys1 = build_keys(table1, &builder1, cancel)?;
        ensure_unique_keys(table1, &keys1, Side::File1)?;
        let keys2 = build_keys(table2, &builder2, cancel)?;
        let index = RowIndex::build(table2, keys2, Side::File2)?;
        debug!(rows1 = keys1.len(), indexed = index.len(), "built row index");

        let matcher = RowMatcher::new(&plan.compared, self.cell_comparator);
        let threshold = self.options.parallel_threshold;
        let outcome = if threshold > 0 && table1.row_count() >= threshold {
            debug!(threshold, "matching rows in parallel");
            matcher.match_parallel(table1, &keys1, table2, &index, cancel)?
        } else {
            matcher.match_sequential(table1, &keys1, table2, index, cancel)?
        };

        let stats = ComparisonStats {
            rows1: table1.row_count(),
            rows2: table2.row_count(),
            rows_matched: outcome.rows_matched,
            rows_modified: outcome.rows_modified,
            rows_unchanged: outcome.rows_matched - outcome.rows_modified,
            cells_changed: outcome.differences.len(),
        };
        debug!(?stats, "comparison finished");

        Ok(ComparisonResult::from_parts(ResultParts {
            identifier_columns: self.options.identifier_columns.clone(),
            compared_columns: plan.compared_names(),
            differences: outcome.differences,
            orphan_columns1: plan.orphan_columns1,
            orphan_columns2: plan.orphan_columns2,
            orphan_rows1: materialize(table1, &outcome.unmatched1),
            orphan_rows2: materialize(table2, &outcome.unmatched2),
            stats,
        }))
    }
}

/// Copy the given rows into a standalone table with the source column order
fn materialize(source: &Table, positions: &[usize]) -> Table {
    let rows = source.rows();
    Table::from_rows(
        Arc::clone(source.schema()),
        positions.iter().map(|&i| rows[i].clone()),
    )
}

/// Convenience function to compare two tables
pub fn compare_tables(
    table1: &Table,
    table2: &Table,
    options: &CompareOptions,
) -> Result<ComparisonResult> {
    CompareEngine::new(options.clone()).compare(table1, table2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompareError, ConfigError};
    use crate::model::{KeyNormalization, RowKey};

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_records(columns, rows.iter().map(|r| r.iter().copied())).unwrap()
    }

    fn key(values: &[&str]) -> RowKey {
        RowKey::new(values.iter().map(|v| v.to_string()).collect())
    }

    fn ids(table: &Table, column: &str) -> Vec<String> {
        table
            .rows()
            .iter()
            .map(|r| r.get(column).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_identity() {
        let t = table(
            &["id", "a", "b"],
            &[&["1", "5", "9"], &["2", "x", "y"], &["3", "", ""]],
        );
        let result = compare_tables(&t, &t.clone(), &CompareOptions::new(["id"])).unwrap();
        assert!(result.is_identical());
        assert_eq!(result.stats().rows_unchanged, 3);
    }

    #[test]
    fn test_cell_difference() {
        let t1 = table(&["id", "a", "b"], &[&["1", "5", "9"]]);
        let t2 = table(&["id", "a", "b"], &[&["1", "5", "10"]]);
        let result = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();

        assert_eq!(
            result.differences(),
            &[Difference {
                key: key(&["1"]),
                column: "b".into(),
                value1: "9".into(),
                value2: "10".into(),
            }]
        );
        assert!(!result.has_orphan_rows());
        assert!(!result.has_orphan_columns());
        assert_eq!(result.stats().rows_modified, 1);
        assert_eq!(result.stats().cells_changed, 1);
    }

    #[test]
    fn test_orphan_rows() {
        let t1 = table(&["id", "a", "b"], &[&["1", "5", "9"], &["2", "1", "1"]]);
        let t2 = table(&["id", "a", "b"], &[&["1", "5", "9"]]);
        let result = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();

        assert_eq!(ids(result.orphan_rows1(), "id"), vec!["2"]);
        assert!(result.orphan_rows2().is_empty());
        assert!(!result.has_differences());
        assert_eq!(
            result.orphan_rows1().column_names().collect::<Vec<_>>(),
            vec!["id", "a", "b"]
        );
    }

    #[test]
    fn test_orphan_rows_keep_source_order() {
        let t1 = table(&["id", "v"], &[&["1", "a"]]);
        let t2 = table(
            &["v", "id"],
            &[&["x", "9"], &["a", "1"], &["y", "4"], &["z", "7"]],
        );
        let result = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();
        assert_eq!(ids(result.orphan_rows2(), "id"), vec!["9", "4", "7"]);
        assert_eq!(
            result.orphan_rows2().column_names().collect::<Vec<_>>(),
            vec!["v", "id"]
        );
    }

    #[test]
    fn test_orphan_columns() {
        let t1 = table(&["id", "a"], &[&["1", "5"]]);
        let t2 = table(&["id", "a", "c"], &[&["1", "5", "x"]]);
        let result = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();
        assert_eq!(result.orphan_columns2(), &["c".to_string()]);
        assert!(result.orphan_columns1().is_empty());
        assert!(!result.has_differences());
    }

    #[test]
    fn test_empty_identifier_fails_before_reading_rows() {
        let t = table(&["id"], &[&["1"], &["1"]]);
        let err = compare_tables(&t, &t, &CompareOptions::new(Vec::<String>::new())).unwrap_err();
        assert!(matches!(
            err,
            CompareError::Configuration(ConfigError::EmptyIdentifier)
        ));
    }

    #[test]
    fn test_exclusion_respected() {
        let t1 = table(&["id", "x", "y"], &[&["1", "a", "b"]]);
        let t2 = table(&["id", "x", "y"], &[&["1", "A", "B"]]);
        let options = CompareOptions::new(["id"]).with_exclusion_columns(["x"]);
        let result = compare_tables(&t1, &t2, &options).unwrap();
        let columns: Vec<_> = result.differences().iter().map(|d| d.column.as_str()).collect();
        assert_eq!(columns, vec!["y"]);
    }

    #[test]
    fn test_inclusion_respected() {
        let t1 = table(&["id", "x", "y", "z"], &[&["1", "a", "b", "c"]]);
        let t2 = table(&["id", "x", "y", "z"], &[&["1", "A", "B", "C"]]);
        let options = CompareOptions::new(["id"]).with_inclusion_columns(["y"]);
        let result = compare_tables(&t1, &t2, &options).unwrap();
        let columns: Vec<_> = result.differences().iter().map(|d| d.column.as_str()).collect();
        assert_eq!(columns, vec!["y"]);
        assert_eq!(result.compared_columns(), &["y".to_string()]);
    }

    #[test]
    fn test_composite_key() {
        let t1 = table(
            &["region", "id", "v"],
            &[&["EU", "1", "a"], &["US", "1", "b"]],
        );
        let t2 = table(
            &["id", "region", "v"],
            &[&["1", "US", "b"], &["1", "EU", "changed"]],
        );
        let result = compare_tables(&t1, &t2, &CompareOptions::new(["region", "id"])).unwrap();
        assert_eq!(result.differences().len(), 1);
        assert_eq!(result.differences()[0].key, key(&["EU", "1"]));
        assert!(!result.has_orphan_rows());
    }

    #[test]
    fn test_duplicate_key_in_either_side() {
        let dup = table(&["id", "v"], &[&["1", "a"], &["2", "b"], &["1", "c"]]);
        let ok = table(&["id", "v"], &[&["1", "a"]]);
        let options = CompareOptions::new(["id"]);

        match compare_tables(&dup, &ok, &options).unwrap_err() {
            CompareError::DuplicateKey {
                side,
                key: k,
                first_line,
                second_line,
            } => {
                assert_eq!(side, Side::File1);
                assert_eq!(k, key(&["1"]));
                assert_eq!((first_line, second_line), (2, 4));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            compare_tables(&ok, &dup, &options).unwrap_err(),
            CompareError::DuplicateKey {
                side: Side::File2,
                ..
            }
        ));
    }

    #[test]
    fn test_key_trimming_policy() {
        let t1 = table(&["id", "v"], &[&[" 1", "a"]]);
        let t2 = table(&["id", "v"], &[&["1 ", "a"]]);

        let trimmed = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();
        assert!(trimmed.is_identical());

        let exact = CompareOptions::new(["id"]).with_key_normalization(KeyNormalization::Exact);
        let result = compare_tables(&t1, &t2, &exact).unwrap();
        assert_eq!(result.orphan_rows1().row_count(), 1);
        assert_eq!(result.orphan_rows2().row_count(), 1);
    }

    #[test]
    fn test_trimmed_keys_can_collide() {
        let t = table(&["id"], &[&["1"], &[" 1 "]]);
        let err = compare_tables(&t, &t, &CompareOptions::new(["id"])).unwrap_err();
        assert!(matches!(err, CompareError::DuplicateKey { .. }));
    }

    #[test]
    fn test_determinism_under_row_reordering() {
        let t1 = table(
            &["id", "v"],
            &[&["1", "a"], &["2", "b"], &["3", "c"], &["5", "e"]],
        );
        let t1_shuffled = table(
            &["id", "v"],
            &[&["5", "e"], &["3", "c"], &["1", "a"], &["2", "b"]],
        );
        let t2 = table(
            &["id", "v"],
            &[&["4", "d"], &["3", "C"], &["1", "a"], &["2", "B"], &["6", "f"]],
        );
        let t2_shuffled = table(
            &["id", "v"],
            &[&["2", "B"], &["6", "f"], &["1", "a"], &["4", "d"], &["3", "C"]],
        );
        let options = CompareOptions::new(["id"]);

        let baseline = compare_tables(&t1, &t2, &options).unwrap();
        let mut expected_diffs = baseline.differences().to_vec();
        expected_diffs.sort_by(|x, y| x.key.cmp(&y.key));
        assert_eq!(expected_diffs.len(), 2);

        for (left, right) in [
            (&t1_shuffled, &t2),
            (&t1, &t2_shuffled),
            (&t1_shuffled, &t2_shuffled),
        ] {
            let result = compare_tables(left, right, &options).unwrap();

            let mut diffs = result.differences().to_vec();
            diffs.sort_by(|x, y| x.key.cmp(&y.key));
            assert_eq!(diffs, expected_diffs);

            assert_eq!(ids(result.orphan_rows1(), "id"), vec!["5"]);
            let mut orphans2 = ids(result.orphan_rows2(), "id");
            orphans2.sort();
            assert_eq!(orphans2, vec!["4", "6"]);
            assert_eq!(result.stats(), baseline.stats());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let n = 5_000;
        let rows1: Vec<Vec<String>> = (0..n)
            .map(|i| vec![i.to_string(), format!("v{}", i), "same".to_string()])
            .collect();
        let rows2: Vec<Vec<String>> = (0..n)
            .filter(|i| i % 7 != 0)
            .map(|i| {
                let v = if i % 3 == 0 { format!("w{}", i) } else { format!("v{}", i) };
                vec![i.to_string(), v, "same".to_string()]
            })
            .chain((n..n + 50).map(|i| vec![i.to_string(), "x".into(), "y".into()]))
            .collect();
        let t1 = Table::from_records(&["id", "v", "w"], rows1).unwrap();
        let t2 = Table::from_records(&["id", "v", "w"], rows2).unwrap();

        let sequential = CompareOptions::new(["id"]).with_parallel_threshold(0);
        let parallel = CompareOptions::new(["id"]).with_parallel_threshold(1);
        let a = compare_tables(&t1, &t2, &sequential).unwrap();
        let b = compare_tables(&t1, &t2, &parallel).unwrap();

        assert_eq!(a.differences(), b.differences());
        assert_eq!(a.stats(), b.stats());
        assert_eq!(ids(a.orphan_rows1(), "id"), ids(b.orphan_rows1(), "id"));
        assert_eq!(ids(a.orphan_rows2(), "id"), ids(b.orphan_rows2(), "id"));
        assert_eq!(a.orphan_rows2().row_count(), 50);
    }

    #[test]
    fn test_cancelled_before_matching() {
        let t = table(&["id"], &[&["1"]]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let engine = CompareEngine::new(CompareOptions::new(["id"]));
        assert!(matches!(
            engine.compare_with_cancel(&t, &t, &cancel).unwrap_err(),
            CompareError::Cancelled
        ));
    }

    #[test]
    fn test_ignore_case_option() {
        let t1 = table(&["id", "name"], &[&["1", "Alice"]]);
        let t2 = table(&["id", "name"], &[&["1", "alice"]]);
        let strict = compare_tables(&t1, &t2, &CompareOptions::new(["id"])).unwrap();
        assert!(strict.has_differences());

        let relaxed = compare_tables(&t1, &t2, &CompareOptions::new(["id"]).with_ignore_case(true))
            .unwrap();
        assert!(!relaxed.has_differences());
    }
}
