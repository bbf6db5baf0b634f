//! csvcompare - Key-based comparison of two CSV datasets
//!
//! Matches rows of two tables by identifier columns and reports cell-level
//! differences, columns present on one side only, and rows with no
//! counterpart on the other side.

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod runner;

pub use config::{CompareOptions, Config};
pub use diff::{compare_tables, CompareEngine, ComparisonResult, Difference};
pub use error::{CompareError, ConfigError};
pub use model::Table;
pub use runner::compare_async;
