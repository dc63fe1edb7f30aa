//! The artifacts handed to the rendering layer

use super::narrative::{ROUND_CEILING_NOTICE, clarification_text, limit_narrative, summary_narrative};
use crate::conversation::{Activity, Role, Transcript};
use crate::core::error::DomainError;
use crate::result::{QueryExecution, ResultClassification, Table};
use crate::routing::{EndReason, LimitReason};
use serde::Serialize;

/// How the session terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Termination {
    Completed,
    Limited(LimitReason),
    RoundCeiling,
}

/// Result rows, or a notice that they must be retrieved separately
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultPayload {
    Rows { table: Table },
    Overflow {
        row_count: usize,
        /// Full sorted result, kept for out-of-band export
        #[serde(skip)]
        table: Table,
    },
}

impl ResultPayload {
    fn from_execution(execution: &QueryExecution) -> Self {
        if execution.classification.carries_payload() {
            ResultPayload::Rows {
                table: execution.table.clone(),
            }
        } else {
            ResultPayload::Overflow {
                row_count: execution.row_count,
                table: execution.table.clone(),
            }
        }
    }

    pub fn table(&self) -> &Table {
        match self {
            ResultPayload::Rows { table } | ResultPayload::Overflow { table, .. } => table,
        }
    }
}

/// Final session artifacts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOutcome {
    pub question: String,
    pub classification: Option<ResultClassification>,
    pub query: Option<String>,
    pub payload: Option<ResultPayload>,
    pub narrative: String,
    pub termination: Termination,
    /// Transcript length when the session ended
    pub rounds: usize,
}

impl SessionOutcome {
    /// Derive the outcome from a finished transcript
    pub fn from_transcript(transcript: &Transcript, end: EndReason) -> Result<Self, DomainError> {
        let execution = transcript
            .messages()
            .iter()
            .rev()
            .find_map(|m| m.query_result());

        let query = execution.map(|e| e.query.clone()).or_else(|| {
            transcript
                .messages()
                .iter()
                .rev()
                .find_map(|m| m.draft())
                .map(|d| d.query.clone())
        });

        let (termination, narrative) = match end {
            EndReason::Completed => {
                let text = transcript
                    .latest(Role::Summarizer, Activity::Utterance)
                    .map(|m| m.content())
                    .unwrap_or_default();
                (Termination::Completed, summary_narrative(text))
            }
            EndReason::RoundCeiling => (Termination::RoundCeiling, ROUND_CEILING_NOTICE.to_string()),
            EndReason::Limited => {
                let reason = transcript
                    .messages()
                    .iter()
                    .rev()
                    .find_map(|m| m.limit_reason())
                    .copied()
                    .ok_or(DomainError::MissingLimitReason)?;
                let narrative = match reason {
                    LimitReason::ClarificationNeeded => transcript
                        .latest(Role::Planner, Activity::Utterance)
                        .map(|m| clarification_text(m.content()))
                        .unwrap_or_default(),
                    other => limit_narrative(other).to_string(),
                };
                (Termination::Limited(reason), narrative)
            }
        };

        Ok(Self {
            question: transcript.question().to_string(),
            classification: execution.map(|e| e.classification),
            query,
            payload: execution.map(ResultPayload::from_execution),
            narrative,
            termination,
            rounds: transcript.len(),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.termination == Termination::Completed
    }
}
