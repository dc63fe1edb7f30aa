//! Append-only session transcript

use super::message::{Activity, Message};
use super::participant::Participant;
use super::role::Role;
use serde::Serialize;

/// Ordered history of one session's messages.
///
/// Never empty: it always starts with the proxy's question. Messages are
/// only ever appended, never reordered or edited.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Open a transcript with the proxy's raw question
    pub fn start(proxy: &Participant, question: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::utterance(proxy, question).at_position(0)],
        }
    }

    /// Append a message and return it with its assigned position
    pub fn append(&mut self, message: Message) -> &Message {
        let position = self.messages.len();
        self.messages.push(message.at_position(position));
        &self.messages[position]
    }

    /// Number of messages so far; this is the round number
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn first(&self) -> &Message {
        &self.messages[0]
    }

    pub fn last(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }

    /// The question the session was opened with
    pub fn question(&self) -> &str {
        self.first().content()
    }

    /// Most recent message spoken by `role` with the given activity
    pub fn latest(&self, role: Role, activity: Activity) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == role && m.activity() == activity)
    }

    /// Number of messages where `role` performed `activity`
    pub fn count(&self, role: Role, activity: Activity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role() == role && m.activity() == activity)
            .count()
    }
}
