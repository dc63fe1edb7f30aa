//! Tabular store port
//!
//! Read-only access to the relational store questions are asked against.

use async_trait::async_trait;
use council_domain::{Table, TableProfile};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Store task failed: {0}")]
    Task(String),
}

/// Read-only tabular store
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Run a query verbatim and return its rows
    async fn run_query(&self, query: &str) -> Result<Table, StoreError>;

    /// Distinct values of `column` in `table`, in the store's enumeration order
    async fn distinct_values(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Vec<Option<String>>, StoreError>;

    /// Column names, declared types and sample rows of `table`
    async fn describe(&self, table: &str) -> Result<TableProfile, StoreError>;
}
