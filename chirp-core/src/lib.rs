//! chirp-core - message-relay backend behind a federated messaging gateway
//!
//! Stores per-user message history, tracks the directed contact/subscriber
//! graph, maps logical users to external network addresses, and fans
//! newly-recorded messages out to subscribers through a host-supplied
//! transport. The wire protocol, authentication and connection lifecycle
//! live in the host; this crate is driven entirely by protocol-event
//! callbacks.

pub mod config;
pub mod core_identity;
pub mod core_notify;
pub mod core_relay;
pub mod core_roster;
pub mod core_store;
pub mod logging;
pub mod metrics;
pub mod test_utils;

// Re-exports
pub use config::{ConfigError, RelayConfig};
pub use core_identity::{ExternalAddress, IdentityError, IdentityRegistry};
pub use core_notify::{HandlerError, MessageHandler, NotificationBus, SubscriberFanout};
pub use core_relay::{
    Clock, OutboundCommand, QueuedTransport, RelayBackend, RelayError, RelayResult, SystemClock,
    Transport,
};
pub use core_roster::{PresenceError, PresenceFlags, Roster};
pub use core_store::{Message, MessageId, MessageStore, Timestamp, UserId};
pub use logging::{init_logging, LogLevel};
