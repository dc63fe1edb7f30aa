//! Participants and the session roster

use super::role::Role;
use serde::{Deserialize, Serialize};

/// One member of the exchange (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Speaker identity written on every message
    pub name: String,
    pub role: Role,
    /// Whether this participant may request tool execution
    pub may_request_tools: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            may_request_tools: false,
        }
    }

    pub fn with_tools(mut self) -> Self {
        self.may_request_tools = true;
        self
    }
}

/// Fixed roster created once per session.
///
/// Holds exactly one participant per [`Role`], stored in [`Role::ALL`] order.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: [Participant; 7],
}

impl Roster {
    /// The standard roster: only the author may request tools.
    pub fn standard() -> Self {
        Self {
            participants: [
                Participant::new("user_proxy", Role::Proxy),
                Participant::new("planner", Role::Planner),
                Participant::new("query_author", Role::Author).with_tools(),
                Participant::new("query_critic", Role::Critic),
                Participant::new("query_executor", Role::Executor),
                Participant::new("summarizer", Role::Summarizer),
                Participant::new("limiter", Role::Limiter),
            ],
        }
    }

    /// Get the participant holding `role`
    pub fn participant(&self, role: Role) -> &Participant {
        &self.participants[role.index()]
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::standard()
    }
}
