//! Fixtures for relay tests

use crate::core_identity::ExternalAddress;
use crate::core_notify::{HandlerError, MessageHandler};
use crate::core_relay::clock::Clock;
use crate::core_store::model::message::Message;
use crate::core_store::model::types::{Timestamp, UserId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub fn user(name: &str) -> UserId {
    UserId::new(name)
}

pub fn address(value: &str) -> ExternalAddress {
    ExternalAddress::new(value)
}

/// Clock with a programmable, manually advanced time
pub struct FixedClock {
    millis: AtomicU64,
}

impl FixedClock {
    pub fn starting_at(millis: u64) -> Self {
        FixedClock {
            millis: AtomicU64::new(millis),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Handler that records every message it sees
#[derive(Default)]
pub struct RecordingHandler {
    seen: Mutex<Vec<Message>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Message> {
        self.seen.lock().expect("recording handler lock poisoned").clone()
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError> {
        self.seen
            .lock()
            .expect("recording handler lock poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Handler that always fails, for fan-out resilience tests
pub struct FailingHandler;

#[async_trait]
impl MessageHandler for FailingHandler {
    async fn on_message(&self, _message: &Message) -> Result<(), HandlerError> {
        Err(HandlerError::new("handler configured to fail"))
    }
}
