//! Prompt domain
//!
//! System prompts for each reasoning participant, bound to the table profile.

mod template;

pub use template::PromptBook;
