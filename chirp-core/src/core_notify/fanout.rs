//! Delivery of recorded messages to subscriber addresses
//!
//! The delivery handler the backend registers on its bus: formats
//! `"author: text"` and hands it to the transport for every subscriber of
//! the author that has a registered address. Subscribers without one are
//! skipped, in keeping with the absent-is-empty policy of the roster.

use super::bus::{HandlerError, MessageHandler};
use crate::core_identity::IdentityRegistry;
use crate::core_relay::transport::Transport;
use crate::core_roster::Roster;
use crate::core_store::model::message::Message;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Fans recorded messages out to the author's subscribers
pub struct SubscriberFanout {
    roster: Arc<RwLock<Roster>>,
    identity: Arc<RwLock<IdentityRegistry>>,
    transport: Arc<dyn Transport>,
}

impl SubscriberFanout {
    pub fn new(
        roster: Arc<RwLock<Roster>>,
        identity: Arc<RwLock<IdentityRegistry>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        SubscriberFanout {
            roster,
            identity,
            transport,
        }
    }
}

#[async_trait]
impl MessageHandler for SubscriberFanout {
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError> {
        let body = format!("{}: {}", message.author, message.text);
        let subscribers = self.roster.read().await.subscribers_of(&message.author);

        let mut delivered = 0usize;
        let mut skipped = 0usize;
        for subscriber in subscribers {
            let address = match self.identity.read().await.address_for(&subscriber) {
                Ok(address) => address,
                Err(_) => {
                    debug!(subscriber = %subscriber, "subscriber has no registered address, skipping");
                    skipped += 1;
                    continue;
                }
            };
            self.transport.deliver(&address, &body).await;
            delivered += 1;
        }

        counter!("relay.fanout.delivered").increment(delivered as u64);
        counter!("relay.fanout.skipped").increment(skipped as u64);
        info!(
            author = %message.author,
            delivered,
            skipped,
            "fan-out complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::model::types::{Timestamp, UserId};
    use crate::test_utils::RecordingTransport;

    fn fixture() -> (
        Arc<RwLock<Roster>>,
        Arc<RwLock<IdentityRegistry>>,
        Arc<RecordingTransport>,
        SubscriberFanout,
    ) {
        let roster = Arc::new(RwLock::new(Roster::new()));
        let identity = Arc::new(RwLock::new(IdentityRegistry::new()));
        let transport = Arc::new(RecordingTransport::new());
        let fanout =
            SubscriberFanout::new(roster.clone(), identity.clone(), transport.clone());
        (roster, identity, transport, fanout)
    }

    #[tokio::test]
    async fn test_delivers_formatted_body_to_each_subscriber_address() {
        let (roster, identity, transport, fanout) = fixture();
        let bob = UserId::new("bob");
        let alice = UserId::new("alice");

        roster.write().await.add_subscriber(&bob, alice.clone());
        identity
            .write()
            .await
            .register(alice, &crate::core_identity::ExternalAddress::new("alice@x"));

        let message = Message::new(bob, "hi", Timestamp::from_millis(1));
        fanout.on_message(&message).await.unwrap();

        let deliveries = transport.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0.as_str(), "alice@x");
        assert_eq!(deliveries[0].1, "bob: hi");
    }

    #[tokio::test]
    async fn test_skips_subscribers_without_an_address() {
        let (roster, _identity, transport, fanout) = fixture();
        let bob = UserId::new("bob");

        roster.write().await.add_subscriber(&bob, UserId::new("nobody"));

        let message = Message::new(bob, "hi", Timestamp::from_millis(1));
        fanout.on_message(&message).await.unwrap();

        assert!(transport.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_deliveries_follow_subscriber_sequence_order() {
        let (roster, identity, transport, fanout) = fixture();
        let bob = UserId::new("bob");
        let first = UserId::new("first");
        let second = UserId::new("second");

        roster.write().await.add_subscriber(&bob, first.clone());
        roster.write().await.add_subscriber(&bob, second.clone());
        {
            let mut identity = identity.write().await;
            identity.register(first, &crate::core_identity::ExternalAddress::new("first@x"));
            identity.register(second, &crate::core_identity::ExternalAddress::new("second@x"));
        }

        let message = Message::new(bob, "hi", Timestamp::from_millis(1));
        fanout.on_message(&message).await.unwrap();

        let targets: Vec<String> = transport
            .deliveries()
            .into_iter()
            .map(|(to, _)| to.as_str().to_string())
            .collect();
        assert_eq!(targets, vec!["first@x", "second@x"]);
    }
}
