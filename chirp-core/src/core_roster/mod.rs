//! Contact graph and presence flags
//!
//! Two directed relations per user (contacts shown as followed, and
//! subscribers notified of the user's messages) plus the per-user
//! presence-monitoring flag.

pub mod presence;
pub mod roster;

pub use presence::{PresenceError, PresenceFlags};
pub use roster::Roster;
