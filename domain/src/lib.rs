//! Domain layer for tabular-council
//!
//! This crate contains the core conversation logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A fixed roster of participants answers one question over one table:
//!
//! - **Planner**: drafts a checklist, or asks the user to clarify
//! - **Author**: writes the query, probing the store through tools
//! - **Critic**: approves or rejects the draft
//! - **Executor**: runs the approved query and classifies the result
//! - **Summarizer**: narrates a bounded result
//! - **Limiter**: ends the session without further reasoning
//!
//! ## Routing
//!
//! [`ConversationRouter`] picks the next speaker as a pure function of the
//! [`Transcript`]. Retry caps are recomputed from history by the
//! [`RetryGovernor`]; a global round ceiling backstops everything.

pub mod config;
pub mod conversation;
pub mod core;
pub mod outcome;
pub mod prompt;
pub mod resolver;
pub mod result;
pub mod routing;

// Re-export commonly used types
pub use config::OutputFormat;
pub use conversation::{
    Activity, Attachment, Message, Participant, Role, Roster, ToolKind, ToolRequest, Transcript,
};
pub use core::{error::DomainError, question::Question};
pub use outcome::{ResultPayload, SessionOutcome, Termination};
pub use prompt::PromptBook;
pub use resolver::{FuzzyValueResolver, ResolveError, ValueMatches};
pub use result::{
    Cell, ColumnKind, ColumnProfile, ExtractionError, QueryDraft, QueryExecution,
    ResultClassification, Table, TableProfile,
};
pub use routing::{
    ControlToken, ConversationRouter, EndReason, LimitReason, RetryGovernor, RetryLimits, Route,
};
