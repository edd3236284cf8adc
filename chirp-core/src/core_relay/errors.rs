//! Error types for the relay facade

use crate::core_identity::IdentityError;
use crate::core_roster::PresenceError;
use thiserror::Error;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that propagate out of the relay entry points
#[derive(Debug, Error)]
pub enum RelayError {
    /// Identity lookup failed where an address was contractually required
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Presence flag read before first write
    #[error("presence error: {0}")]
    Presence(#[from] PresenceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::model::types::UserId;

    #[test]
    fn test_identity_error_conversion() {
        let err: RelayError = IdentityError::AddressNotFound(UserId::new("ghost")).into();
        assert!(matches!(err, RelayError::Identity(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_presence_error_conversion() {
        let err: RelayError = PresenceError::NotConfigured(UserId::new("ghost")).into();
        assert!(matches!(err, RelayError::Presence(_)));
    }
}
