//! Tabular store adapters

mod sqlite;

pub use sqlite::{SqliteTableStore, quote_identifier};
