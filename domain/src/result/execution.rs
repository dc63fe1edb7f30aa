//! A classified query execution, as attached to the executor's message

use super::classification::{FLAG_MARKER, ResultClassification};
use super::draft::{QUERY_MARKER, QUESTION_MARKER};
use super::table::Table;
use serde::Serialize;

pub const RESULTS_MARKER: &str = "db_results:";

/// Outcome of running one draft query against the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryExecution {
    pub question: String,
    pub query: String,
    pub classification: ResultClassification,
    pub row_count: usize,
    /// Full result; sorted for bounded and overflow results
    #[serde(skip)]
    pub table: Table,
    /// Store error text when the execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl QueryExecution {
    /// Classify a successful execution against `cap`
    pub fn from_table(
        question: impl Into<String>,
        query: impl Into<String>,
        table: Table,
        cap: usize,
    ) -> Self {
        let row_count = table.row_count();
        let classification = ResultClassification::from_row_count(row_count, cap);
        let table = if classification.is_sorted() {
            table.sorted_descending()
        } else {
            table
        };
        Self {
            question: question.into(),
            query: query.into(),
            classification,
            row_count,
            table,
            fault: None,
        }
    }

    /// A failed execution counts as an empty result
    pub fn from_fault(
        question: impl Into<String>,
        query: impl Into<String>,
        fault: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            query: query.into(),
            classification: ResultClassification::Empty,
            row_count: 0,
            table: Table::empty(),
            fault: Some(fault.into()),
        }
    }

    /// Message text for the transcript.
    ///
    /// Echoes the question and exact query, then the flag line. Rows are
    /// inlined except for overflow, which gets an out-of-band notice.
    pub fn render(&self) -> String {
        let results = if self.classification.carries_payload() {
            self.table.to_records().to_string()
        } else {
            format!(
                "{} rows exceed the inline limit; retrieve the full result set separately",
                self.row_count
            )
        };
        format!(
            "{QUESTION_MARKER} {}\n{QUERY_MARKER} {}\n{FLAG_MARKER} {}\n{RESULTS_MARKER} {}\nTERMINATE-AGENT",
            self.question,
            self.query,
            self.classification.flag(),
            results
        )
    }
}
