//! Transport doubles for tests

use crate::core_identity::ExternalAddress;
use crate::core_relay::transport::{OutboundCommand, Transport};
use async_trait::async_trait;
use std::sync::Mutex;

/// Transport that records every outbound command in call order
#[derive(Default)]
pub struct RecordingTransport {
    commands: Mutex<Vec<OutboundCommand>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<OutboundCommand> {
        self.commands
            .lock()
            .expect("recording transport lock poisoned")
            .clone()
    }

    /// Only the message deliveries, as `(to, body)` pairs
    pub fn deliveries(&self) -> Vec<(ExternalAddress, String)> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                OutboundCommand::Deliver { to, body } => Some((to, body)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, command: OutboundCommand) {
        self.commands
            .lock()
            .expect("recording transport lock poisoned")
            .push(command);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(&self, to: &ExternalAddress, body: &str) {
        self.record(OutboundCommand::Deliver {
            to: to.clone(),
            body: body.to_string(),
        });
    }

    async fn accept_subscription(&self, to: &ExternalAddress, from: &ExternalAddress) {
        self.record(OutboundCommand::AcceptSubscription {
            to: to.clone(),
            from: from.clone(),
        });
    }

    async fn request_subscription(&self, to: &ExternalAddress, from: &ExternalAddress) {
        self.record(OutboundCommand::RequestSubscription {
            to: to.clone(),
            from: from.clone(),
        });
    }

    async fn send_presence(
        &self,
        to: &ExternalAddress,
        from: &ExternalAddress,
        status: Option<&str>,
    ) {
        self.record(OutboundCommand::Presence {
            to: to.clone(),
            from: from.clone(),
            status: status.map(str::to_string),
        });
    }
}
