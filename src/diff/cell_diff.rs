//! Cell-level comparison logic

/// Cell comparator with configurable options.
///
/// The default is exact, case-sensitive string equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellComparator {
    ignore_case: bool,
    ignore_whitespace: bool,
}

impl CellComparator {
    /// Create a new cell comparator
    pub fn new(ignore_case: bool, ignore_whitespace: bool) -> Self {
        Self {
            ignore_case,
            ignore_whitespace,
        }
    }

    /// Compare two cell values for equality
    pub fn equal(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }

        let (a, b) = if self.ignore_whitespace {
            (a.trim(), b.trim())
        } else {
            (a, b)
        };

        if self.ignore_case {
            a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }
}
