//! Data models for the message store

pub mod message;
pub mod types;

pub use message::Message;
pub use types::{MessageId, Timestamp, UserId};
