//! Store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw tabular store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// SQLite database file
    pub path: PathBuf,
    /// Table questions are asked against
    pub table: String,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("database.db"),
            table: "sales".to_string(),
        }
    }
}
