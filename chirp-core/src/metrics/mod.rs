//! Metrics for the relay's ingestion and fan-out paths
//!
//! Counters are emitted with the `metrics` macros at their call sites;
//! this module registers their descriptions for whatever recorder the
//! host installs.

use metrics::describe_counter;

/// Register descriptions for every counter the relay emits
pub fn init_metrics() {
    describe_counter!(
        "relay.messages.recorded",
        "Messages accepted into the store"
    );
    describe_counter!(
        "relay.messages.rejected",
        "Messages rejected at ingestion (empty or duplicate text)"
    );
    describe_counter!(
        "relay.notify.published",
        "Messages published on the notification bus"
    );
    describe_counter!(
        "relay.notify.handler_failures",
        "Handler errors caught during fan-out"
    );
    describe_counter!(
        "relay.fanout.delivered",
        "Deliveries handed to the transport"
    );
    describe_counter!(
        "relay.fanout.skipped",
        "Subscribers skipped for lack of a registered address"
    );
    describe_counter!("relay.identity.registered", "Identity registrations");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics_does_not_panic() {
        // Describing without an installed recorder must be a no-op.
        init_metrics();
    }
}
