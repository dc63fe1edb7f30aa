//! Retry caps derived from transcript history

use crate::conversation::{Activity, Role, ToolKind, Transcript};
use serde::{Deserialize, Serialize};

/// Per-role repetition caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryLimits {
    /// Query-execution tool calls the author may make
    pub author_queries: usize,
    /// Turns the critic may take
    pub critic_turns: usize,
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self {
            author_queries: 5,
            critic_turns: 3,
        }
    }
}

/// Counts recomputed from the transcript on every call.
///
/// Nothing is stored outside the transcript, so the router stays a pure
/// function of history.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryGovernor {
    limits: RetryLimits,
}

impl RetryGovernor {
    pub fn new(limits: RetryLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }

    /// Number of messages where `role` performed `activity`
    pub fn count(&self, transcript: &Transcript, role: Role, activity: Activity) -> usize {
        transcript.count(role, activity)
    }

    pub fn author_queries(&self, transcript: &Transcript) -> usize {
        self.count(
            transcript,
            Role::Author,
            Activity::ToolCall(ToolKind::RunQuery),
        )
    }

    pub fn critic_turns(&self, transcript: &Transcript) -> usize {
        self.count(transcript, Role::Critic, Activity::Utterance)
    }

    pub fn author_exhausted(&self, transcript: &Transcript) -> bool {
        self.author_queries(transcript) >= self.limits.author_queries
    }

    pub fn critic_exhausted(&self, transcript: &Transcript) -> bool {
        self.critic_turns(transcript) >= self.limits.critic_turns
    }
}
