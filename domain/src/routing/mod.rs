//! Turn routing: control tokens, retry caps and the state machine

pub mod governor;
pub mod route;
pub mod router;
pub mod token;

pub use governor::{RetryGovernor, RetryLimits};
pub use route::{EndReason, LimitReason, Route};
pub use router::{ConversationRouter, DEFAULT_MAX_ROUNDS};
pub use token::ControlToken;
