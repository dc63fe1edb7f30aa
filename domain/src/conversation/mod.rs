//! Conversation model: roles, participants, messages and the transcript.
//!
//! Every message carries its speaker's [`Role`](role::Role) tag, so routing
//! decisions never depend on which object produced a message.

pub mod message;
pub mod participant;
pub mod role;
pub mod tool;
pub mod transcript;

pub use message::{Activity, Attachment, Message};
pub use participant::{Participant, Roster};
pub use role::Role;
pub use tool::{ToolKind, ToolRequest};
pub use transcript::Transcript;
