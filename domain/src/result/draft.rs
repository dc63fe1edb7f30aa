//! The author's {question, query, checklist} record
//!
//! Authors still speak in delimited free text; this module is the single
//! place that text is turned into a structured [`QueryDraft`].

use serde::Serialize;
use thiserror::Error;

pub const QUESTION_MARKER: &str = "user_question:";
pub const QUERY_MARKER: &str = "generated_sql_query:";
pub const CHECKLIST_MARKER: &str = "checklist:";

const HANDOFF_TOKEN: &str = "terminate-agent";

/// Why an author message could not be turned into a draft
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("missing 'user_question:' field")]
    MissingQuestion,

    #[error("missing 'generated_sql_query:' field terminated by 'checklist:'")]
    MissingQuery,

    #[error("generated query is empty")]
    EmptyQuery,
}

/// A candidate query with the question it answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDraft {
    pub question: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<String>,
}

impl QueryDraft {
    pub fn new(question: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            query: query.into(),
            checklist: None,
        }
    }

    pub fn with_checklist(mut self, checklist: impl Into<String>) -> Self {
        self.checklist = Some(checklist.into());
        self
    }

    /// Parse the delimited fields out of an author message.
    ///
    /// The question runs from `user_question:` to `generated_sql_query:`,
    /// the query from there to `checklist:`. The query text is kept
    /// verbatim apart from surrounding code fences.
    ///
    /// # Examples
    ///
    /// ```
    /// use council_domain::result::QueryDraft;
    ///
    /// let text = "user_question: top regions\n\
    ///             generated_sql_query: SELECT region FROM sales\n\
    ///             checklist: - group by region\nTERMINATE-AGENT";
    /// let draft = QueryDraft::parse(text).unwrap();
    /// assert_eq!(draft.query, "SELECT region FROM sales");
    /// assert_eq!(draft.checklist.as_deref(), Some("- group by region"));
    /// ```
    pub fn parse(text: &str) -> Result<Self, ExtractionError> {
        let question_start = text
            .find(QUESTION_MARKER)
            .ok_or(ExtractionError::MissingQuestion)?
            + QUESTION_MARKER.len();
        let query_offset = text[question_start..]
            .find(QUERY_MARKER)
            .ok_or(ExtractionError::MissingQuestion)?;
        let question = text[question_start..question_start + query_offset].trim();
        if question.is_empty() {
            return Err(ExtractionError::MissingQuestion);
        }

        let query_start = question_start + query_offset + QUERY_MARKER.len();
        let checklist_offset = text[query_start..]
            .find(CHECKLIST_MARKER)
            .ok_or(ExtractionError::MissingQuery)?;
        let query = strip_code_fence(&text[query_start..query_start + checklist_offset]);
        if query.is_empty() {
            return Err(ExtractionError::EmptyQuery);
        }

        let rest = &text[query_start + checklist_offset + CHECKLIST_MARKER.len()..];
        let checklist = cut_at_handoff(rest).trim();

        Ok(Self {
            question: question.to_string(),
            query: query.to_string(),
            checklist: (!checklist.is_empty()).then(|| checklist.to_string()),
        })
    }

    /// Render back into the delimited form
    pub fn render(&self) -> String {
        format!(
            "{QUESTION_MARKER} {}\n{QUERY_MARKER} {}\n{CHECKLIST_MARKER} {}\n",
            self.question,
            self.query,
            self.checklist.as_deref().unwrap_or_default()
        )
    }
}

fn cut_at_handoff(text: &str) -> &str {
    match text.to_ascii_lowercase().find(HANDOFF_TOKEN) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Remove a surrounding ``` fence and its optional `sql` tag
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let inner = match inner.get(..3) {
        Some(tag) if tag.eq_ignore_ascii_case("sql") => &inner[3..],
        _ => inner,
    };
    inner.trim()
}
