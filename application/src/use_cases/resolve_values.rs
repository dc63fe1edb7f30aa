//! Resolve Values use case
//!
//! Fetches a column's distinct values and ranks them against a free-text
//! lookup phrase.

use crate::ports::tabular_store::{StoreError, TabularStore};
use council_domain::{FuzzyValueResolver, ResolveError, ValueMatches};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ResolveValuesError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Distinct-value lookup timed out")]
    Timeout,
}

/// Use case for fuzzy categorical-value lookup
pub struct ResolveValuesUseCase<S: TabularStore + 'static> {
    store: Arc<S>,
    resolver: FuzzyValueResolver,
    timeout: Duration,
}

impl<S: TabularStore + 'static> ResolveValuesUseCase<S> {
    pub fn new(store: Arc<S>, resolver: FuzzyValueResolver, timeout: Duration) -> Self {
        Self {
            store,
            resolver,
            timeout,
        }
    }

    pub async fn execute(
        &self,
        lookup: &str,
        table: &str,
        column: &str,
    ) -> Result<ValueMatches, ResolveValuesError> {
        debug!("Resolving '{}' against {}.{}", lookup, table, column);
        let values = tokio::time::timeout(self.timeout, self.store.distinct_values(table, column))
            .await
            .map_err(|_| ResolveValuesError::Timeout)??;
        Ok(self.resolver.resolve(lookup, column, &values)?)
    }

    /// Tool output for the author: `{"<column>": [...]}` or `{"error": "..."}`
    pub async fn tool_output(&self, lookup: &str, table: &str, column: &str) -> String {
        match self.execute(lookup, table, column).await {
            Ok(matches) => matches.to_json().to_string(),
            Err(e) => {
                warn!("Value lookup failed: {}", e);
                json!({ "error": e.to_string() }).to_string()
            }
        }
    }
}
