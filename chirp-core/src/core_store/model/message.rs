/*
    message.rs - Message model for the relay store

    A message is created exactly once on append and never mutated. The
    timestamp is optional: the sentinel returned for an empty history
    carries none, and a missing timestamp orders below any real one.
*/

use super::types::{MessageId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// One recorded message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,

    /// When the message was recorded; `None` only on the sentinel
    pub timestamp: Option<Timestamp>,

    /// Logical user that authored the message
    pub author: UserId,

    /// Message body
    pub text: String,
}

impl Message {
    /// Create a new message recorded at `timestamp`
    pub fn new(author: UserId, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Message {
            id: MessageId::generate(),
            timestamp: Some(timestamp),
            author,
            text: text.into(),
        }
    }

    /// The concrete value returned when a user has no history at all:
    /// no timestamp, empty text, authored by the user themselves.
    pub fn sentinel(author: UserId) -> Self {
        Message {
            id: MessageId::generate(),
            timestamp: None,
            author,
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::new(UserId::new("bob"), "hi", Timestamp::from_millis(42));
        assert_eq!(msg.author, UserId::new("bob"));
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.timestamp, Some(Timestamp::from_millis(42)));
    }

    #[test]
    fn test_sentinel_shape() {
        let msg = Message::sentinel(UserId::new("alice"));
        assert_eq!(msg.timestamp, None);
        assert_eq!(msg.author, UserId::new("alice"));
        assert_eq!(msg.text, "");
    }

    #[test]
    fn test_serialization_round_trip() {
        let msg = Message::new(UserId::new("bob"), "hello", Timestamp::from_millis(7));
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
