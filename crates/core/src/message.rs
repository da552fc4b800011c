//! Message and conversation history types.
//!
//! A session's history is an ordered list of request/reply exchanges. The
//! controller appends one exchange per answered turn and hands the flattened
//! messages to the model as context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user (or the composite prompt built on their behalf)
    User,
    /// The model
    Assistant,
    /// System instructions
    System,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// One prompt sent to the model together with the reply it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub request: Message,
    pub reply: Message,
}

/// Append-only conversation history for one session.
///
/// Order is significant: it defines the model's context window. The only way
/// to remove entries is [`History::clear`], which drops everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    exchanges: Vec<Exchange>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange.
    pub fn push(&mut self, request: impl Into<String>, reply: impl Into<String>) {
        self.exchanges.push(Exchange {
            request: Message::user(request),
            reply: Message::assistant(reply),
        });
    }

    /// Number of exchanges (request/reply pairs).
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// All messages in conversation order: request, reply, request, reply, ...
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.exchanges
            .iter()
            .flat_map(|e| [&e.request, &e.reply])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, assistant!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, assistant!");
    }

    #[test]
    fn history_flattens_in_order() {
        let mut history = History::new();
        history.push("first request", "first reply");
        history.push("second request", "second reply");

        assert_eq!(history.len(), 2);
        let contents: Vec<_> = history.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            ["first request", "first reply", "second request", "second reply"]
        );
        let roles: Vec<_> = history.messages().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn clear_empties_history() {
        let mut history = History::new();
        history.push("a", "b");
        assert!(!history.is_empty());
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.messages().count(), 0);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"assistant\""));
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, msg);
    }
}
