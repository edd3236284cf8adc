//! External network addresses
//!
//! An address may carry a "/resource" qualifier after its bare form;
//! identity bookkeeping is keyed on the bare form so any resource of the
//! same address resolves to the same user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network-reachable identifier in the host messaging protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalAddress(String);

impl ExternalAddress {
    pub fn new(address: impl Into<String>) -> Self {
        ExternalAddress(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address with any resource qualifier stripped (everything from
    /// the first `/` on).
    pub fn bare(&self) -> ExternalAddress {
        match self.0.split_once('/') {
            Some((bare, _)) => ExternalAddress(bare.to_string()),
            None => self.clone(),
        }
    }

    /// The resource qualifier, when present
    pub fn resource(&self) -> Option<&str> {
        self.0.split_once('/').map(|(_, resource)| resource)
    }

    /// The part left of `@`, when present
    pub fn local_part(&self) -> Option<&str> {
        self.0.split_once('@').map(|(local, _)| local)
    }
}

impl fmt::Display for ExternalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_strips_resource() {
        let address = ExternalAddress::new("a@b/laptop");
        assert_eq!(address.bare(), ExternalAddress::new("a@b"));
        assert_eq!(address.resource(), Some("laptop"));
    }

    #[test]
    fn test_bare_of_bare_address_is_identity() {
        let address = ExternalAddress::new("a@b");
        assert_eq!(address.bare(), address);
        assert_eq!(address.resource(), None);
    }

    #[test]
    fn test_bare_splits_on_first_slash_only() {
        let address = ExternalAddress::new("a@b/res/extra");
        assert_eq!(address.bare(), ExternalAddress::new("a@b"));
        assert_eq!(address.resource(), Some("res/extra"));
    }

    #[test]
    fn test_local_part() {
        assert_eq!(ExternalAddress::new("alice@x").local_part(), Some("alice"));
        assert_eq!(ExternalAddress::new("just-a-host").local_part(), None);
    }
}
