//! Outbound capabilities supplied by the protocol layer
//!
//! Every operation is fire-and-forget: implementations enqueue and return.
//! The relay never waits on wire latency, consumes no result, and tracks
//! no acknowledgments; retries, if any, belong to the host transport.

use crate::core_identity::ExternalAddress;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

/// Send capabilities the relay consumes from the host
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a formatted message body to an address
    async fn deliver(&self, to: &ExternalAddress, body: &str);

    /// Accept a presence subscription from `to`, answering as `from`
    async fn accept_subscription(&self, to: &ExternalAddress, from: &ExternalAddress);

    /// Ask `to` for a presence subscription, originated by `from`
    async fn request_subscription(&self, to: &ExternalAddress, from: &ExternalAddress);

    /// Send presence to `to` as `from`, optionally carrying a status text
    async fn send_presence(
        &self,
        to: &ExternalAddress,
        from: &ExternalAddress,
        status: Option<&str>,
    );
}

/// One outbound action, ready for the host protocol component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundCommand {
    Deliver {
        to: ExternalAddress,
        body: String,
    },
    AcceptSubscription {
        to: ExternalAddress,
        from: ExternalAddress,
    },
    RequestSubscription {
        to: ExternalAddress,
        from: ExternalAddress,
    },
    Presence {
        to: ExternalAddress,
        from: ExternalAddress,
        status: Option<String>,
    },
}

/// Transport that forwards commands over an unbounded channel to the async
/// host. Sending never blocks and applies no backpressure; a closed
/// channel means the host is gone, so the command is dropped with a
/// warning rather than surfaced as an error.
pub struct QueuedTransport {
    outbound: mpsc::UnboundedSender<OutboundCommand>,
}

impl QueuedTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCommand>) {
        let (outbound, receiver) = mpsc::unbounded_channel();
        (QueuedTransport { outbound }, receiver)
    }

    fn push(&self, command: OutboundCommand) {
        if self.outbound.send(command).is_err() {
            warn!("outbound channel closed, command dropped");
        }
    }
}

#[async_trait]
impl Transport for QueuedTransport {
    async fn deliver(&self, to: &ExternalAddress, body: &str) {
        self.push(OutboundCommand::Deliver {
            to: to.clone(),
            body: body.to_string(),
        });
    }

    async fn accept_subscription(&self, to: &ExternalAddress, from: &ExternalAddress) {
        self.push(OutboundCommand::AcceptSubscription {
            to: to.clone(),
            from: from.clone(),
        });
    }

    async fn request_subscription(&self, to: &ExternalAddress, from: &ExternalAddress) {
        self.push(OutboundCommand::RequestSubscription {
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
        self.push(OutboundCommand::Presence {
            to: to.clone(),
            from: from.clone(),
            status: status.map(str::to_string),
        });
    }
}
