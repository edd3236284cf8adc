//! Identity mapping between logical users and external addresses
//!
//! Logical users are the keys everything else in the relay is stored
//! under; external addresses are what the host protocol routes to. This
//! module owns the bidirectional binding and the bare-address policy.

pub mod address;
pub mod registry;

pub use address::ExternalAddress;
pub use registry::{IdentityError, IdentityRegistry};
