//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod participant_gateway;
pub mod progress;
pub mod tabular_store;
