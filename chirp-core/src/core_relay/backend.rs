//! Relay backend facade
//!
//! Owns the identity map, roster, presence flags, message store and
//! notification bus behind per-component locks (no ambient globals) and
//! exposes the entry points the protocol gateway calls. Inbound stanzas
//! arrive as resolved `(address, text)` events; everything outbound goes
//! through the host-supplied [`Transport`].
//!
//! Lock discipline: the store write lock is released before the bus
//! fan-out runs, so handlers are free to read roster and identity state.

use super::clock::{Clock, SystemClock};
use super::errors::RelayResult;
use super::transport::Transport;
use crate::config::RelayConfig;
use crate::core_identity::{ExternalAddress, IdentityRegistry};
use crate::core_notify::{NotificationBus, SubscriberFanout};
use crate::core_roster::{PresenceFlags, Roster};
use crate::core_store::model::message::Message;
use crate::core_store::model::types::UserId;
use crate::core_store::store::MessageStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// The message-relay backend behind the protocol gateway
pub struct RelayBackend {
    config: RelayConfig,
    component_address: ExternalAddress,
    identity: Arc<RwLock<IdentityRegistry>>,
    roster: Arc<RwLock<Roster>>,
    presence: Arc<RwLock<PresenceFlags>>,
    store: Arc<RwLock<MessageStore>>,
    bus: Arc<NotificationBus>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl RelayBackend {
    /// Create a backend on the system clock with the subscriber fan-out
    /// handler already registered.
    pub fn new(config: RelayConfig, transport: Arc<dyn Transport>) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: RelayConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let identity = Arc::new(RwLock::new(IdentityRegistry::new()));
        let roster = Arc::new(RwLock::new(Roster::new()));
        let bus = Arc::new(NotificationBus::new());
        bus.subscribe(Arc::new(SubscriberFanout::new(
            roster.clone(),
            identity.clone(),
            transport.clone(),
        )));

        let component_address = ExternalAddress::new(config.component.address.clone());
        RelayBackend {
            config,
            component_address,
            identity,
            roster,
            presence: Arc::new(RwLock::new(PresenceFlags::new())),
            store: Arc::new(RwLock::new(MessageStore::new())),
            bus,
            transport,
            clock,
        }
    }

    /// The bus, for hosts that want to observe recorded messages
    pub fn bus(&self) -> Arc<NotificationBus> {
        self.bus.clone()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The component's own external address
    pub fn component_address(&self) -> &ExternalAddress {
        &self.component_address
    }

    /// Component-minted address for a logical user (`user@domain`)
    pub fn component_address_for(&self, user: &UserId) -> ExternalAddress {
        ExternalAddress::new(format!("{}@{}", user, self.config.component.domain))
    }

    // ---- inbound protocol events ----

    /// Entry point for every inbound message-like event. An unknown sender
    /// address is not an error: the raw address string becomes the logical
    /// user, so anonymous and federated senders still get recorded.
    pub async fn on_message_received(
        &self,
        sender: &ExternalAddress,
        text: &str,
    ) -> Option<Message> {
        let user = match self.identity.read().await.user_for(sender) {
            Some(user) => user,
            None => {
                debug!(address = %sender, "unknown sender, using raw address as user");
                UserId::new(sender.as_str())
            }
        };
        self.record_incoming(&user, text).await
    }

    /// Validate, store and publish one incoming message. Returns `None`
    /// when the text is rejected (empty, or repeating the newest text in
    /// the user's aggregated view); rejection is a no-op, not an error.
    pub async fn record_incoming(&self, user: &UserId, text: &str) -> Option<Message> {
        let now = self.clock.now();
        let recorded = {
            let roster = self.roster.read().await;
            let mut store = self.store.write().await;
            store.ingest(user, text, |u| roster.contacts_of(u), now)
        };
        if let Some(message) = &recorded {
            info!(author = %message.author, "message recorded");
            self.bus.publish(message).await;
        }
        recorded
    }

    /// Presence-subscription request. The policy is fixed: always accept,
    /// announce presence, and reciprocally request a subscription back.
    pub async fn on_subscription_requested(&self, requester: &ExternalAddress) {
        info!(address = %requester, "subscription requested, mutual-subscribing");
        self.transport
            .accept_subscription(requester, &self.component_address)
            .await;
        self.transport
            .send_presence(requester, &self.component_address, None)
            .await;
        self.transport
            .request_subscription(requester, &self.component_address)
            .await;
    }

    /// Presence probe: answer the prober with component presence
    pub async fn on_presence_probe(&self, prober: &ExternalAddress) {
        self.transport
            .send_presence(prober, &self.component_address, None)
            .await;
    }

    /// Status-change events double as posts for monitored users. Unknown
    /// senders and users whose monitoring flag was never configured drop
    /// the event.
    pub async fn on_presence_changed(
        &self,
        sender: &ExternalAddress,
        status: &str,
    ) -> Option<Message> {
        let user = match self.identity.read().await.user_for(sender) {
            Some(user) => user,
            None => {
                debug!(address = %sender, "presence change from unknown sender ignored");
                return None;
            }
        };
        let monitored = self.presence.read().await.monitor(&user).unwrap_or(false);
        if !monitored {
            debug!(user = %user, "presence not monitored, status not recorded");
            return None;
        }
        self.record_incoming(&user, status).await
    }

    // ---- provisioning ----

    /// Bind a logical user to an external address (last write wins)
    pub async fn register_user(&self, user: UserId, address: &ExternalAddress) {
        self.identity.write().await.register(user, address);
    }

    pub async fn add_contact(&self, user: &UserId, contact: UserId) {
        self.roster.write().await.add_contact(user, contact);
    }

    pub async fn add_subscriber(&self, user: &UserId, subscriber: UserId) {
        self.roster.write().await.add_subscriber(user, subscriber);
    }

    pub async fn set_presence_monitoring(&self, user: UserId, enabled: bool) {
        self.presence.write().await.set_monitor(user, enabled);
    }

    /// Strict read: errors for a user that was never configured
    pub async fn presence_monitoring(&self, user: &UserId) -> RelayResult<bool> {
        Ok(self.presence.read().await.monitor(user)?)
    }

    // ---- queries ----

    pub async fn messages_of(&self, user: &UserId) -> Vec<Message> {
        self.store.read().await.messages_of(user).to_vec()
    }

    /// The user's messages merged with their contacts', newest first
    pub async fn aggregated_messages_of(&self, user: &UserId) -> Vec<Message> {
        let roster = self.roster.read().await;
        let store = self.store.read().await;
        store.aggregated_messages_of(user, |u| roster.contacts_of(u))
    }

    pub async fn last_message_of(&self, user: &UserId) -> Message {
        let roster = self.roster.read().await;
        let store = self.store.read().await;
        store.last_message_of(user, |u| roster.contacts_of(u))
    }

    pub async fn address_for(&self, user: &UserId) -> RelayResult<ExternalAddress> {
        Ok(self.identity.read().await.address_for(user)?)
    }

    pub async fn has_address(&self, user: &UserId) -> bool {
        self.identity.read().await.has_address(user)
    }

    pub async fn contacts_of(&self, user: &UserId) -> Vec<UserId> {
        self.roster.read().await.contacts_of(user)
    }

    pub async fn subscribers_of(&self, user: &UserId) -> Vec<UserId> {
        self.roster.read().await.subscribers_of(user)
    }

    /// Users with at least one recorded message
    pub async fn all_users(&self) -> Vec<UserId> {
        self.store.read().await.users()
    }

    // ---- contact presence (component-originated traffic) ----

    /// Push each contact's latest text to `user` as a presence status,
    /// originated from the contact's component address. Requires `user`
    /// to have a registered address.
    pub async fn push_contact_statuses(&self, user: &UserId) -> RelayResult<()> {
        let address = self.identity.read().await.address_for(user)?;
        let contacts = self.roster.read().await.contacts_of(user);
        for contact in contacts {
            let status = {
                let roster = self.roster.read().await;
                let store = self.store.read().await;
                store.last_message_of(&contact, |u| roster.contacts_of(u)).text
            };
            let from = self.component_address_for(&contact);
            self.transport
                .send_presence(&address, &from, Some(&status))
                .await;
        }
        Ok(())
    }

    /// Ask `address` to subscribe to each of its user's contacts,
    /// originated from the contacts' component addresses. Nothing to do
    /// when no user is registered behind the address.
    pub async fn request_contact_subscriptions(&self, address: &ExternalAddress) {
        let user = match self.identity.read().await.user_for(address) {
            Some(user) => user,
            None => {
                debug!(address = %address, "no user behind address, nothing to request");
                return;
            }
        };
        let contacts = self.roster.read().await.contacts_of(&user);
        for contact in contacts {
            let from = self.component_address_for(&contact);
            self.transport.request_subscription(address, &from).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{address, user, FixedClock, RecordingTransport};
    use crate::core_relay::transport::OutboundCommand;

    fn backend(transport: Arc<RecordingTransport>) -> RelayBackend {
        RelayBackend::with_clock(
            RelayConfig::default(),
            transport,
            Arc::new(FixedClock::starting_at(1_000)),
        )
    }

    #[tokio::test]
    async fn test_component_address_for_uses_the_configured_domain() {
        let backend = backend(Arc::new(RecordingTransport::new()));
        let minted = backend.component_address_for(&user("bob"));
        assert_eq!(
            minted.as_str(),
            format!("bob@{}", backend.config().component.domain)
        );
    }

    #[tokio::test]
    async fn test_subscription_request_is_mutually_subscribed() {
        let transport = Arc::new(RecordingTransport::new());
        let backend = backend(transport.clone());
        let requester = address("claudio@x");

        backend.on_subscription_requested(&requester).await;

        let component = backend.component_address().clone();
        assert_eq!(
            transport.commands(),
            vec![
                OutboundCommand::AcceptSubscription {
                    to: requester.clone(),
                    from: component.clone()
                },
                OutboundCommand::Presence {
                    to: requester.clone(),
                    from: component.clone(),
                    status: None
                },
                OutboundCommand::RequestSubscription {
                    to: requester,
                    from: component
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_presence_probe_is_answered_with_component_presence() {
        let transport = Arc::new(RecordingTransport::new());
        let backend = backend(transport.clone());
        let prober = address("claudio@x");

        backend.on_presence_probe(&prober).await;

        assert_eq!(
            transport.commands(),
            vec![OutboundCommand::Presence {
                to: prober,
                from: backend.component_address().clone(),
                status: None
            }]
        );
    }
}
