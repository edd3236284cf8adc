//! Identity registry: logical users bound to external addresses
//!
//! Both directions are kept, keyed on the bare address form. Registration
//! is last-write-wins in both directions and never fails; entries are
//! never removed.

use super::address::ExternalAddress;
use crate::core_store::model::types::UserId;
use metrics::counter;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

/// Errors from identity lookups
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The user was never registered
    #[error("no registered address for user: {0}")]
    AddressNotFound(UserId),
}

/// Bidirectional user/address mapping
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    user_to_address: HashMap<UserId, ExternalAddress>,
    address_to_user: HashMap<ExternalAddress, UserId>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        IdentityRegistry {
            user_to_address: HashMap::new(),
            address_to_user: HashMap::new(),
        }
    }

    /// Bind `user` to the bare form of `address`. A prior binding for the
    /// user, or a prior user in the same bare-address bucket, is
    /// overwritten silently.
    pub fn register(&mut self, user: UserId, address: &ExternalAddress) {
        let bare = address.bare();
        info!(user = %user, address = %bare, "registered identity");
        self.address_to_user.insert(bare.clone(), user.clone());
        self.user_to_address.insert(user, bare);
        counter!("relay.identity.registered").increment(1);
    }

    /// The bare address bound to `user`; an error if none was registered
    pub fn address_for(&self, user: &UserId) -> Result<ExternalAddress, IdentityError> {
        self.user_to_address
            .get(user)
            .cloned()
            .ok_or_else(|| IdentityError::AddressNotFound(user.clone()))
    }

    pub fn has_address(&self, user: &UserId) -> bool {
        self.user_to_address.contains_key(user)
    }

    /// The user behind an address, matched on its bare form. An unknown
    /// address is a legitimate case (federated/anonymous senders), not an
    /// error.
    pub fn user_for(&self, address: &ExternalAddress) -> Option<UserId> {
        self.address_to_user.get(&address.bare()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve_both_directions() {
        let mut registry = IdentityRegistry::new();
        let alice = UserId::new("alice");
        registry.register(alice.clone(), &ExternalAddress::new("alice@x/home"));

        assert_eq!(
            registry.address_for(&alice).unwrap(),
            ExternalAddress::new("alice@x")
        );
        assert!(registry.has_address(&alice));
        assert_eq!(
            registry.user_for(&ExternalAddress::new("alice@x")),
            Some(alice)
        );
    }

    #[test]
    fn test_lookup_matches_any_resource_of_the_bare_address() {
        let mut registry = IdentityRegistry::new();
        let alice = UserId::new("alice");
        registry.register(alice.clone(), &ExternalAddress::new("a@b/res1"));

        assert_eq!(
            registry.user_for(&ExternalAddress::new("a@b/res2")),
            Some(alice)
        );
    }

    #[test]
    fn test_register_is_last_write_wins_for_the_user() {
        let mut registry = IdentityRegistry::new();
        let alice = UserId::new("alice");
        registry.register(alice.clone(), &ExternalAddress::new("alice@old"));
        registry.register(alice.clone(), &ExternalAddress::new("alice@new"));

        assert_eq!(
            registry.address_for(&alice).unwrap(),
            ExternalAddress::new("alice@new")
        );
    }

    #[test]
    fn test_register_is_last_write_wins_for_the_address_bucket() {
        let mut registry = IdentityRegistry::new();
        registry.register(UserId::new("alice"), &ExternalAddress::new("shared@x"));
        registry.register(UserId::new("bob"), &ExternalAddress::new("shared@x/phone"));

        assert_eq!(
            registry.user_for(&ExternalAddress::new("shared@x")),
            Some(UserId::new("bob"))
        );
    }

    #[test]
    fn test_unknown_user_is_an_error_unknown_address_is_not() {
        let registry = IdentityRegistry::new();
        let ghost = UserId::new("ghost");

        assert!(matches!(
            registry.address_for(&ghost),
            Err(IdentityError::AddressNotFound(_))
        ));
        assert!(!registry.has_address(&ghost));
        assert_eq!(registry.user_for(&ExternalAddress::new("ghost@x")), None);
    }
}
