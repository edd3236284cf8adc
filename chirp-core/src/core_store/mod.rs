//! Message history for the relay
//!
//! Append-only per-user logs with read-time aggregation across a user's
//! contacts. The store performs no I/O and holds everything for the
//! process lifetime; persistence belongs to the host.

pub mod model;
pub mod store;

#[cfg(test)]
mod tests;

pub use model::message::Message;
pub use model::types::{MessageId, Timestamp, UserId};
pub use store::MessageStore;
