//! Tool requests a participant may issue during its turn

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The tools available to participants that may request execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Run an exploratory query against the tabular store
    RunQuery,
    /// Rank a column's distinct values against a free-text phrase
    FetchDistinctValues,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::RunQuery, ToolKind::FetchDistinctValues];

    /// Wire name used in function-calling schemas
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::RunQuery => "run_query",
            ToolKind::FetchDistinctValues => "fetch_distinct_values",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ToolKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s.trim())
            .ok_or_else(|| DomainError::UnknownTool(s.to_string()))
    }
}

/// A typed tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRequest {
    RunQuery {
        query: String,
    },
    FetchDistinctValues {
        lookup: String,
        table: String,
        column: String,
    },
}

impl ToolRequest {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::RunQuery { .. } => ToolKind::RunQuery,
            ToolRequest::FetchDistinctValues { .. } => ToolKind::FetchDistinctValues,
        }
    }

    /// Build a request from a function-call name and its JSON arguments.
    ///
    /// `fetch_distinct_values` also accepts the `look_up_value` / `table_name` /
    /// `column_name` argument names.
    pub fn from_call(name: &str, arguments: &serde_json::Value) -> Result<Self, DomainError> {
        let kind: ToolKind = name.parse()?;
        let field = |keys: &[&str]| -> Result<String, DomainError> {
            keys.iter()
                .find_map(|key| arguments.get(*key).and_then(|v| v.as_str()))
                .map(|s| s.to_string())
                .ok_or_else(|| DomainError::InvalidToolArguments {
                    tool: kind.name().to_string(),
                    reason: format!("missing string argument '{}'", keys[0]),
                })
        };

        match kind {
            ToolKind::RunQuery => Ok(ToolRequest::RunQuery {
                query: field(&["query"])?,
            }),
            ToolKind::FetchDistinctValues => Ok(ToolRequest::FetchDistinctValues {
                lookup: field(&["lookup", "look_up_value"])?,
                table: field(&["table", "table_name"])?,
                column: field(&["column", "column_name"])?,
            }),
        }
    }

    /// One-line description recorded as the tool-call message body
    pub fn describe(&self) -> String {
        match self {
            ToolRequest::RunQuery { query } => format!("{}: {}", self.kind(), query),
            ToolRequest::FetchDistinctValues {
                lookup,
                table,
                column,
            } => format!(
                "{}: lookup '{}' in {}.{}",
                self.kind(),
                lookup,
                table,
                column
            ),
        }
    }
}
