//! Output format value object

use serde::{Deserialize, Serialize};

/// How a session outcome is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Narrative, query, classification and the result table
    Full,
    /// Only the narrative (default)
    #[default]
    Summary,
    /// The outcome as JSON
    Json,
}
