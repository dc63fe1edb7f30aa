//! Final artifacts of a session

pub mod narrative;
pub mod session_outcome;

pub use narrative::{
    GENERIC_FAILURE, OVERFLOW_NOTICE, ROUND_CEILING_NOTICE, SINGLETON_NOTICE, SUMMARY_INCOMPLETE,
    clarification_text, limit_narrative, summary_narrative,
};
pub use session_outcome::{ResultPayload, SessionOutcome, Termination};
