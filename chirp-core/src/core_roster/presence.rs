//! Presence-monitoring flags
//!
//! A plain per-user boolean. The read is strict: a user whose flag was
//! never written is an error, not a default, and callers decide their own
//! fallback.

use crate::core_store::model::types::UserId;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from presence-flag reads
#[derive(Debug, Error)]
pub enum PresenceError {
    /// The flag was read before it was ever set
    #[error("presence monitoring never configured for user: {0}")]
    NotConfigured(UserId),
}

/// Per-user "monitor presence" setting
#[derive(Debug, Default)]
pub struct PresenceFlags {
    monitored: HashMap<UserId, bool>,
}

impl PresenceFlags {
    pub fn new() -> Self {
        PresenceFlags {
            monitored: HashMap::new(),
        }
    }

    pub fn set_monitor(&mut self, user: UserId, enabled: bool) {
        self.monitored.insert(user, enabled);
    }

    pub fn monitor(&self, user: &UserId) -> Result<bool, PresenceError> {
        self.monitored
            .get(user)
            .copied()
            .ok_or_else(|| PresenceError::NotConfigured(user.clone()))
    }
}
