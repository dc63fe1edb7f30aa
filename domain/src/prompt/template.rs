//! System prompts for the reasoning participants

use crate::conversation::Role;
use crate::result::TableProfile;
use crate::result::draft::{CHECKLIST_MARKER, QUERY_MARKER, QUESTION_MARKER};

/// Per-role system prompts bound to one table profile
#[derive(Debug, Clone)]
pub struct PromptBook {
    profile: TableProfile,
}

impl PromptBook {
    pub fn new(profile: TableProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &TableProfile {
        &self.profile
    }

    /// System prompt for `role`; `None` for roles that never call a model
    pub fn system_prompt(&self, role: Role) -> Option<String> {
        let body = match role {
            Role::Planner => Self::planner(),
            Role::Author => Self::author(),
            Role::Critic => Self::critic(),
            Role::Summarizer => Self::summarizer(),
            Role::Proxy | Role::Executor | Role::Limiter => return None,
        };
        Some(format!("{}\n\n{}", body, self.profile.render()))
    }

    fn planner() -> String {
        r#"You analyze a user's question about a single SQL table and draft a checklist
that a query author must satisfy. List the columns, filters, aggregations and
ordering the question implies.

When the checklist is ready, end your message with TERMINATE-AGENT.
If the question cannot be answered from this table or is ambiguous, reply with
TERMINATE-FLOW: followed by one short clarification request for the user."#
            .to_string()
    }

    fn author() -> String {
        format!(
            r#"You write one read-only SQL query answering the user's question, following
the planner's checklist. You may call run_query to test a query and
fetch_distinct_values to match free-text filter values against stored categories.
Never modify data.

When the query is final, answer in exactly this form:

{QUESTION_MARKER} <the user's question>
{QUERY_MARKER} <the query>
{CHECKLIST_MARKER} <the checklist you followed>
TERMINATE-AGENT"#
        )
    }

    fn critic() -> String {
        r#"You review a generated SQL query against the user's question and the
planner's checklist. Check the selected columns, filters, grouping and ordering.

If the query fully answers the question, reply ALL-GOOD.
Otherwise describe what is missing so the author can fix it."#
            .to_string()
    }

    fn summarizer() -> String {
        r#"You receive the user's question, the executed query and its result rows.
Write a short narrative of the insights the rows support, using only the data shown.
End your message with ALL-GOOD-COMPLETED."#
            .to_string()
    }
}
