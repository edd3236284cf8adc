//! Notification fan-out for newly-recorded messages
//!
//! A synchronous-in-order bus of message handlers plus the delivery
//! handler that resolves subscribers to addresses and hands bodies to the
//! transport.

pub mod bus;
pub mod fanout;

pub use bus::{HandlerError, MessageHandler, NotificationBus};
pub use fanout::SubscriberFanout;
