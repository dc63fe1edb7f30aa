//! Control tokens participants use to hand off or stop the flow

use serde::Serialize;

/// A literal, case-insensitive marker scanned for in message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlToken {
    /// Hand the turn to the next stage
    TerminateAgent,
    /// Stop the flow and ask the user for clarification
    TerminateFlow,
    /// The critic approves the draft
    AllGood,
    /// The summarizer has finished
    AllGoodCompleted,
}

impl ControlToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlToken::TerminateAgent => "terminate-agent",
            ControlToken::TerminateFlow => "terminate-flow",
            ControlToken::AllGood => "all-good",
            ControlToken::AllGoodCompleted => "all-good-completed",
        }
    }

    /// Case-insensitive substring test
    pub fn is_in(&self, text: &str) -> bool {
        text.to_ascii_lowercase().contains(self.as_str())
    }

    /// Byte offset just past the first occurrence of the token
    pub fn end_in(&self, text: &str) -> Option<usize> {
        text.to_ascii_lowercase()
            .find(self.as_str())
            .map(|idx| idx + self.as_str().len())
    }

    /// Byte offset of the first occurrence of the token
    pub fn start_in(&self, text: &str) -> Option<usize> {
        text.to_ascii_lowercase().find(self.as_str())
    }

    /// The first of `candidates` present in `text`.
    ///
    /// `candidates` is in priority order, so the decision is single-valued
    /// even when a message carries several tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use council_domain::routing::ControlToken;
    ///
    /// let planner = [ControlToken::TerminateAgent, ControlToken::TerminateFlow];
    /// let found = ControlToken::first_in("... TERMINATE-FLOW: which region?", &planner);
    /// assert_eq!(found, Some(ControlToken::TerminateFlow));
    /// ```
    pub fn first_in(text: &str, candidates: &[ControlToken]) -> Option<ControlToken> {
        let lowered = text.to_ascii_lowercase();
        candidates
            .iter()
            .copied()
            .find(|token| lowered.contains(token.as_str()))
    }
}

impl std::fmt::Display for ControlToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}
