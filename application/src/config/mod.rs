//! Application-level configuration.
//!
//! - [`SessionParams`]: session loop control (round ceiling, retry caps, row cap, timeouts)

pub mod session_params;

pub use session_params::SessionParams;
