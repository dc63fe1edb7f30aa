//! Session parameters: use case loop control.
//!
//! [`SessionParams`] groups the static parameters that bound one session
//! run by [`RunSessionUseCase`](crate::use_cases::run_session::RunSessionUseCase).

use council_domain::{ConversationRouter, FuzzyValueResolver, RetryLimits};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    /// Global round ceiling (transcript length).
    pub max_rounds: usize,
    /// Per-role retry caps.
    pub limits: RetryLimits,
    /// Row cap separating bounded from overflow results.
    pub row_cap: usize,
    /// Number of candidates the value resolver returns.
    pub candidate_limit: usize,
    /// Timeout for each participant or store call.
    pub timeout: Duration,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            limits: RetryLimits::default(),
            row_cap: 20,
            candidate_limit: 15,
            timeout: Duration::from_secs(120),
        }
    }
}

impl SessionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_limits(mut self, limits: RetryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_row_cap(mut self, cap: usize) -> Self {
        self.row_cap = cap;
        self
    }

    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn router(&self) -> ConversationRouter {
        ConversationRouter::new(self.max_rounds, self.limits)
    }

    pub fn resolver(&self) -> FuzzyValueResolver {
        FuzzyValueResolver::new(self.candidate_limit)
    }
}
