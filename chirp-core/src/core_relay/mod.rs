//! Relay facade and the seams to the host protocol layer
//!
//! [`RelayBackend`] is the single owner of all relay state and the target
//! of every protocol-event callback; [`Transport`] and [`Clock`] are what
//! it consumes from the host.

pub mod backend;
pub mod clock;
pub mod errors;
pub mod transport;

pub use backend::RelayBackend;
pub use clock::{Clock, SystemClock};
pub use errors::{RelayError, RelayResult};
pub use transport::{OutboundCommand, QueuedTransport, Transport};
