/*
    store.rs - Append-only per-user message log

    Write path never reorders: each user's log grows in arrival order.
    Ordering for queries is computed at read time: aggregation concatenates
    the user's own log with each contact's log (contact-list order) and
    stable-sorts descending by timestamp, so equal or missing timestamps
    keep concatenation order.
*/

use super::model::message::Message;
use super::model::types::{Timestamp, UserId};
use metrics::counter;
use std::collections::HashMap;
use tracing::debug;

/// Per-user message history with read-time aggregation
#[derive(Debug, Default)]
pub struct MessageStore {
    logs: HashMap<UserId, Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        MessageStore {
            logs: HashMap::new(),
        }
    }

    /// Append without validation; `ingest` is the validated entry point.
    pub fn append(&mut self, user: &UserId, message: Message) {
        self.logs.entry(user.clone()).or_default().push(message);
    }

    /// The user's own log only, oldest first. Unknown users have an empty
    /// log, not an error.
    pub fn messages_of(&self, user: &UserId) -> &[Message] {
        self.logs.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Union of the user's log and every contact's log, newest first.
    ///
    /// Concatenation order is own messages first, then contacts in
    /// contact-list order; the sort is stable, so messages with equal
    /// timestamps (and the sentinel's missing timestamp) retain that
    /// relative order.
    pub fn aggregated_messages_of<F>(&self, user: &UserId, contacts: F) -> Vec<Message>
    where
        F: Fn(&UserId) -> Vec<UserId>,
    {
        let mut combined: Vec<Message> = self.messages_of(user).to_vec();
        for contact in contacts(user) {
            combined.extend_from_slice(self.messages_of(&contact));
        }
        combined.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        combined
    }

    /// Head of the aggregated view, or the sentinel when the user and
    /// their contacts have no messages. Always a concrete value.
    pub fn last_message_of<F>(&self, user: &UserId, contacts: F) -> Message
    where
        F: Fn(&UserId) -> Vec<UserId>,
    {
        self.aggregated_messages_of(user, contacts)
            .into_iter()
            .next()
            .unwrap_or_else(|| Message::sentinel(user.clone()))
    }

    /// Validated ingestion: rejects empty text and a repeat of the newest
    /// text in the user's aggregated view, otherwise timestamps and
    /// appends. Returns the stored message on acceptance, `None` on a
    /// rejection (which is a no-op, not an error).
    pub fn ingest<F>(
        &mut self,
        user: &UserId,
        text: &str,
        contacts: F,
        now: Timestamp,
    ) -> Option<Message>
    where
        F: Fn(&UserId) -> Vec<UserId>,
    {
        if text.is_empty() {
            debug!(user = %user, "rejected empty message");
            counter!("relay.messages.rejected").increment(1);
            return None;
        }
        if self.last_message_of(user, &contacts).text == text {
            debug!(user = %user, "rejected consecutive duplicate message");
            counter!("relay.messages.rejected").increment(1);
            return None;
        }
        let message = Message::new(user.clone(), text, now);
        self.append(user, message.clone());
        counter!("relay.messages.recorded").increment(1);
        Some(message)
    }

    /// Users with at least one recorded message
    pub fn users(&self) -> Vec<UserId> {
        self.logs.keys().cloned().collect()
    }
}
