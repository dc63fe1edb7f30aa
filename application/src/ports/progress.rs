//! Progress notification port
//!
//! Defines the interface for reporting progress while a session runs.

use council_domain::{Role, ToolKind, Termination};

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer.
pub trait SessionProgressNotifier: Send + Sync {
    /// Called before `role` takes its turn at `round`
    fn on_turn_start(&self, role: Role, round: usize);

    /// Called after `role`'s turn has been appended
    fn on_turn_complete(&self, role: Role, round: usize);

    /// Called when a participant invokes a tool
    fn on_tool_invoked(&self, _tool: ToolKind) {}

    /// Called once when the session terminates
    fn on_session_end(&self, _termination: &Termination) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoSessionProgress;

impl SessionProgressNotifier for NoSessionProgress {
    fn on_turn_start(&self, _role: Role, _round: usize) {}
    fn on_turn_complete(&self, _role: Role, _round: usize) {}
}
