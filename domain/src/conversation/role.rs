//! Participant roles

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role tag carried by every participant and every message.
///
/// The router switches on this tag; it never inspects participant identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Human proxy: opens the session with the raw question
    Proxy,
    /// Analyses the question and drafts a checklist, or asks for clarification
    Planner,
    /// Writes the query, may probe the store through tools
    Author,
    /// Reviews the author's query against the checklist
    Critic,
    /// Runs the approved query and classifies the result
    Executor,
    /// Turns a bounded result into a narrative
    Summarizer,
    /// Ends the session without further reasoning
    Limiter,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Proxy,
        Role::Planner,
        Role::Author,
        Role::Critic,
        Role::Executor,
        Role::Summarizer,
        Role::Limiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Proxy => "proxy",
            Role::Planner => "planner",
            Role::Author => "author",
            Role::Critic => "critic",
            Role::Executor => "executor",
            Role::Summarizer => "summarizer",
            Role::Limiter => "limiter",
        }
    }

    /// Position of this role in [`Role::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Role::Proxy => 0,
            Role::Planner => 1,
            Role::Author => 2,
            Role::Critic => 3,
            Role::Executor => 4,
            Role::Summarizer => 5,
            Role::Limiter => 6,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Proxy => "Proxy",
            Role::Planner => "Planner",
            Role::Author => "Query Author",
            Role::Critic => "Query Critic",
            Role::Executor => "Executor",
            Role::Summarizer => "Summarizer",
            Role::Limiter => "Limiter",
        }
    }

    /// Whether turns for this role are produced by an external reasoning service
    pub fn is_reasoning(&self) -> bool {
        matches!(
            self,
            Role::Planner | Role::Author | Role::Critic | Role::Summarizer
        )
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}
