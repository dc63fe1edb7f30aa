//! Routing decisions

use crate::conversation::Role;
use crate::result::ResultClassification;
use serde::{Deserialize, Serialize};

/// Why a session was sent to the limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", content = "role", rename_all = "snake_case")]
pub enum LimitReason {
    /// The planner asked the user to clarify the question
    ClarificationNeeded,
    AuthorRetriesExhausted,
    CriticRejectionsExhausted,
    ResultEmpty,
    ResultSingleton,
    ResultOverflow,
    /// The author's message had no usable query
    ExtractionFailed,
    /// The summarizer did not signal completion
    SummaryIncomplete,
    /// A participant call failed or timed out
    ParticipantFailed(Role),
}

impl LimitReason {
    /// Limit reason for a classification that stops the flow
    pub fn for_classification(classification: ResultClassification) -> Option<Self> {
        match classification {
            ResultClassification::Empty => Some(LimitReason::ResultEmpty),
            ResultClassification::Singleton => Some(LimitReason::ResultSingleton),
            ResultClassification::Overflow => Some(LimitReason::ResultOverflow),
            ResultClassification::Bounded => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LimitReason::ClarificationNeeded => "clarification needed".to_string(),
            LimitReason::AuthorRetriesExhausted => "author query attempts exhausted".to_string(),
            LimitReason::CriticRejectionsExhausted => "critic rejections exhausted".to_string(),
            LimitReason::ResultEmpty => "query returned no rows".to_string(),
            LimitReason::ResultSingleton => "query returned a single row".to_string(),
            LimitReason::ResultOverflow => "query returned too many rows".to_string(),
            LimitReason::ExtractionFailed => "no query could be extracted".to_string(),
            LimitReason::SummaryIncomplete => "summary incomplete".to_string(),
            LimitReason::ParticipantFailed(role) => format!("{} failed", role.display_name()),
        }
    }
}

impl std::fmt::Display for LimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The summarizer signalled completion
    Completed,
    /// The limiter spoke
    Limited,
    /// The global round ceiling was reached
    RoundCeiling,
}

/// The router's decision after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "value", rename_all = "snake_case")]
pub enum Route {
    /// Dispatch the next turn to this role
    Speak(Role),
    /// Dispatch to the limiter for the given reason
    Limit(LimitReason),
    /// Stop the session
    End(EndReason),
}

impl Route {
    /// Role that speaks next, if the session continues
    pub fn next_role(&self) -> Option<Role> {
        match self {
            Route::Speak(role) => Some(*role),
            Route::Limit(_) => Some(Role::Limiter),
            Route::End(_) => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Route::End(_))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Speak(role) => write!(f, "-> {}", role),
            Route::Limit(reason) => write!(f, "-> limiter ({})", reason),
            Route::End(reason) => write!(f, "end ({:?})", reason),
        }
    }
}
