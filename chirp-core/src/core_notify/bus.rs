//! Message-arrival notification bus
//!
//! Handlers run sequentially in registration order; a failing handler is
//! reported and never stops the fan-out. There is no unsubscribe and no
//! retry.

use crate::core_store::model::message::Message;
use async_trait::async_trait;
use metrics::counter;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::warn;

/// A handler failed while processing a published message
#[derive(Debug, Error)]
#[error("notification handler failed: {0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(reason: impl Into<String>) -> Self {
        HandlerError(reason.into())
    }
}

/// Receives every message the backend records
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError>;
}

/// Ordered registry of message handlers
#[derive(Default)]
pub struct NotificationBus {
    handlers: RwLock<Vec<Arc<dyn MessageHandler>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        NotificationBus {
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: Arc<dyn MessageHandler>) {
        self.handlers
            .write()
            .expect("handler registry lock poisoned")
            .push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .expect("handler registry lock poisoned")
            .len()
    }

    /// Invoke every registered handler with `message`, in registration
    /// order. Once started the fan-out runs to completion: handler errors
    /// are logged and counted, never propagated.
    pub async fn publish(&self, message: &Message) {
        // Dispatch runs on a snapshot so a handler may subscribe without
        // touching the registry lock mid-iteration.
        let handlers: Vec<Arc<dyn MessageHandler>> = self
            .handlers
            .read()
            .expect("handler registry lock poisoned")
            .clone();
        counter!("relay.notify.published").increment(1);
        for handler in handlers {
            if let Err(error) = handler.on_message(message).await {
                counter!("relay.notify.handler_failures").increment(1);
                warn!(error = %error, author = %message.author, "notification handler failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::model::types::{Timestamp, UserId};
    use std::sync::Mutex;

    struct Tagger {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageHandler for Tagger {
        async fn on_message(&self, _message: &Message) -> Result<(), HandlerError> {
            self.log.lock().unwrap().push(self.tag);
            if self.fail {
                Err(HandlerError::new("tagged to fail"))
            } else {
                Ok(())
            }
        }
    }

    fn message() -> Message {
        Message::new(UserId::new("bob"), "hi", Timestamp::from_millis(1))
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let bus = NotificationBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Tagger { tag: "first", log: log.clone(), fail: false }));
        bus.subscribe(Arc::new(Tagger { tag: "second", log: log.clone(), fail: false }));

        bus.publish(&message()).await;

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_the_fanout() {
        let bus = NotificationBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Tagger { tag: "boom", log: log.clone(), fail: true }));
        bus.subscribe(Arc::new(Tagger { tag: "after", log: log.clone(), fail: false }));

        bus.publish(&message()).await;

        assert_eq!(*log.lock().unwrap(), vec!["boom", "after"]);
    }

    #[tokio::test]
    async fn test_publish_with_no_handlers_is_a_noop() {
        let bus = NotificationBus::new();
        bus.publish(&message()).await;
        assert_eq!(bus.handler_count(), 0);
    }
}
