//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: the user's natural-language question
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod question;
