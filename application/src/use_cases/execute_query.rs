//! Execute Query use case
//!
//! The built-in executor: runs the author's approved query against the
//! tabular store and classifies the result. Store faults never escape; they
//! become an empty classification.

use crate::ports::tabular_store::TabularStore;
use council_domain::{
    Activity, Attachment, ExtractionError, Message, Participant, QueryDraft, QueryExecution, Role,
    Transcript,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Use case for running and classifying queries
pub struct ExecuteQueryUseCase<S: TabularStore + 'static> {
    store: Arc<S>,
    row_cap: usize,
    timeout: Duration,
}

impl<S: TabularStore + 'static> ExecuteQueryUseCase<S> {
    pub fn new(store: Arc<S>, row_cap: usize, timeout: Duration) -> Self {
        Self {
            store,
            row_cap,
            timeout,
        }
    }

    /// The draft to execute: the author's latest utterance, using its parsed
    /// attachment when present.
    pub fn latest_draft(transcript: &Transcript) -> Result<QueryDraft, ExtractionError> {
        let message = transcript
            .latest(Role::Author, Activity::Utterance)
            .ok_or(ExtractionError::MissingQuestion)?;
        match message.draft() {
            Some(draft) => Ok(draft.clone()),
            None => QueryDraft::parse(message.content()),
        }
    }

    /// Run `draft.query` verbatim and classify the outcome
    pub async fn classify(&self, draft: &QueryDraft) -> QueryExecution {
        info!("Executing query: {}", draft.query);
        match tokio::time::timeout(self.timeout, self.store.run_query(&draft.query)).await {
            Ok(Ok(table)) => {
                let execution =
                    QueryExecution::from_table(&draft.question, &draft.query, table, self.row_cap);
                debug!(
                    "Query returned {} rows ({})",
                    execution.row_count, execution.classification
                );
                execution
            }
            Ok(Err(e)) => {
                warn!("Query failed, treating as empty: {}", e);
                QueryExecution::from_fault(&draft.question, &draft.query, e.to_string())
            }
            Err(_) => {
                warn!("Query timed out after {:?}, treating as empty", self.timeout);
                QueryExecution::from_fault(
                    &draft.question,
                    &draft.query,
                    format!("query timed out after {:?}", self.timeout),
                )
            }
        }
    }

    /// Produce the executor's message for the current transcript.
    ///
    /// When no draft can be extracted nothing is executed and the message
    /// carries no classification.
    pub async fn executor_message(&self, executor: &Participant, transcript: &Transcript) -> Message {
        match Self::latest_draft(transcript) {
            Ok(draft) => {
                let execution = self.classify(&draft).await;
                Message::utterance(executor, execution.render())
                    .with_attachment(Attachment::QueryResult(execution))
            }
            Err(e) => {
                warn!("No query could be extracted: {}", e);
                Message::utterance(executor, format!("No query could be extracted: {}", e))
            }
        }
    }

    /// Exploratory run for the author: at most `row_cap` rows as JSON
    /// records, or the store's error text
    pub async fn probe(&self, query: &str) -> String {
        debug!("Probe query: {}", query);
        match tokio::time::timeout(self.timeout, self.store.run_query(query)).await {
            Ok(Ok(table)) => table.truncated(self.row_cap).to_records().to_string(),
            Ok(Err(e)) => format!("Error: {}", e),
            Err(_) => format!("Error: query timed out after {:?}", self.timeout),
        }
    }
}
