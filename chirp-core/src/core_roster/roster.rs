//! Directed contact and subscriber relations
//!
//! Both relations preserve insertion order and keep duplicates: adding the
//! same contact twice yields two entries. Contacts drive message
//! aggregation; subscribers drive delivery fan-out.

use crate::core_store::model::types::UserId;
use std::collections::HashMap;

/// Per-user contact and subscriber sequences
#[derive(Debug, Default)]
pub struct Roster {
    contacts: HashMap<UserId, Vec<UserId>>,
    subscribers: HashMap<UserId, Vec<UserId>>,
}

impl Roster {
    pub fn new() -> Self {
        Roster {
            contacts: HashMap::new(),
            subscribers: HashMap::new(),
        }
    }

    /// Append `contact` to the user's contact sequence, creating it on
    /// first use. Duplicates are preserved, not collapsed.
    pub fn add_contact(&mut self, user: &UserId, contact: UserId) {
        self.contacts.entry(user.clone()).or_default().push(contact);
    }

    /// The user's contacts in insertion order; empty for unknown users
    pub fn contacts_of(&self, user: &UserId) -> Vec<UserId> {
        self.contacts.get(user).cloned().unwrap_or_default()
    }

    /// Append `subscriber` to the users that get the user's messages
    /// fanned out to them
    pub fn add_subscriber(&mut self, user: &UserId, subscriber: UserId) {
        self.subscribers
            .entry(user.clone())
            .or_default()
            .push(subscriber);
    }

    /// The user's subscribers in insertion order; empty for unknown users
    pub fn subscribers_of(&self, user: &UserId) -> Vec<UserId> {
        self.subscribers.get(user).cloned().unwrap_or_default()
    }
}
