//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_query;
pub mod resolve_values;
pub mod run_session;
