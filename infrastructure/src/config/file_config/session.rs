//! Session configuration from TOML (`[session]` section)

use council_application::SessionParams;
use council_domain::RetryLimits;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw session limits from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Global round ceiling
    pub max_rounds: usize,
    /// Query-execution tool calls the author may make
    pub author_query_limit: usize,
    /// Turns the critic may take
    pub critic_turn_limit: usize,
    /// Rows above which a result counts as overflow
    pub row_cap: usize,
    /// Candidates returned by the value resolver
    pub candidate_limit: usize,
    /// Timeout in seconds for each participant or store call
    pub timeout_seconds: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        let params = SessionParams::default();
        Self {
            max_rounds: params.max_rounds,
            author_query_limit: params.limits.author_queries,
            critic_turn_limit: params.limits.critic_turns,
            row_cap: params.row_cap,
            candidate_limit: params.candidate_limit,
            timeout_seconds: params.timeout.as_secs(),
        }
    }
}

impl FileSessionConfig {
    pub fn to_session_params(&self) -> SessionParams {
        SessionParams::default()
            .with_max_rounds(self.max_rounds)
            .with_limits(RetryLimits {
                author_queries: self.author_query_limit,
                critic_turns: self.critic_turn_limit,
            })
            .with_row_cap(self.row_cap)
            .with_candidate_limit(self.candidate_limit)
            .with_timeout(Duration::from_secs(self.timeout_seconds))
    }
}
