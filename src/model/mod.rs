//! Data model for tabular data representation

mod key;
mod schema;
mod table;

pub use key::{KeyBuilder, KeyNormalization, RowKey};
pub use schema::Schema;
pub use table::{Row, Table, TableError};
