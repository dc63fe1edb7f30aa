//! User-facing narrative for each way a session can end

use crate::routing::{ControlToken, LimitReason};

pub const GENERIC_FAILURE: &str =
    "Sorry, I could not generate a correct query. Would you like to rephrase the question?";
pub const OVERFLOW_NOTICE: &str =
    "The result is too large to summarize. Retrieve the full result set separately.";
pub const SINGLETON_NOTICE: &str =
    "The query returned a single record; see the result data for the answer.";
pub const SUMMARY_INCOMPLETE: &str = "The data was retrieved but a summary could not be produced.";
pub const ROUND_CEILING_NOTICE: &str =
    "Could not complete the request within the allowed number of turns.";

/// Fixed narrative for a limit reason other than clarification
pub fn limit_narrative(reason: LimitReason) -> &'static str {
    match reason {
        LimitReason::ResultOverflow => OVERFLOW_NOTICE,
        LimitReason::ResultSingleton => SINGLETON_NOTICE,
        LimitReason::SummaryIncomplete => SUMMARY_INCOMPLETE,
        LimitReason::ClarificationNeeded
        | LimitReason::ResultEmpty
        | LimitReason::ExtractionFailed
        | LimitReason::AuthorRetriesExhausted
        | LimitReason::CriticRejectionsExhausted
        | LimitReason::ParticipantFailed(_) => GENERIC_FAILURE,
    }
}

/// Planner text following `terminate-flow` and an optional colon
pub fn clarification_text(planner_text: &str) -> String {
    let Some(end) = ControlToken::TerminateFlow.end_in(planner_text) else {
        return planner_text.trim().to_string();
    };
    let rest = planner_text[end..].trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    rest.trim().to_string()
}

/// Summarizer narrative: text before the completion token, or the
/// `insights` field when that text is a JSON object.
pub fn summary_narrative(summarizer_text: &str) -> String {
    let body = match ControlToken::AllGoodCompleted.start_in(summarizer_text) {
        Some(start) => &summarizer_text[..start],
        None => summarizer_text,
    };
    let body = strip_json_fence(body.trim());

    if let Ok(serde_json::Value::Object(object)) = serde_json::from_str(body) {
        if let Some(insights) = object.get("insights") {
            return match insights {
                serde_json::Value::String(text) => text.trim().to_string(),
                other => other.to_string(),
            };
        }
    }
    body.to_string()
}

fn strip_json_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.strip_prefix("json").unwrap_or(inner).trim()
}
