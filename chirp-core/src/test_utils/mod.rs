//! Test utilities and fixtures shared by unit and integration tests

pub mod fixtures;
pub mod transports;

pub use fixtures::*;
pub use transports::*;
