//! Best-effort delivery to the enabled sinks.
//!
//! At most one call per sink per event, gated strictly by the routing
//! decision. A failed or timed-out delivery is logged and never affects the
//! other sink or later events. No retries, no queueing, no internal state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::pipeline::types::RoutingDecision;

/// Bound on a single sink call, so one slow destination cannot stall the
/// handling of later events.
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(30);

/// A delivery target for rendered payloads.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &str;

    /// Deliver one payload.
    async fn deliver(&self, payload: &str) -> Result<(), ChannelError>;
}

/// Fans an event's payload out to the sinks its decision enables.
pub struct Dispatcher {
    relay: Arc<dyn Sink>,
    webhook: Option<Arc<dyn Sink>>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(relay: Arc<dyn Sink>, webhook: Option<Arc<dyn Sink>>) -> Self {
        Self {
            relay,
            webhook,
            timeout: DEFAULT_SINK_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Deliver the payload to every sink the decision enables.
    pub async fn dispatch(&self, decision: RoutingDecision, payload: &str) {
        if decision.forward {
            self.send(self.relay.as_ref(), payload).await;
        }

        if decision.webhook {
            match &self.webhook {
                Some(webhook) => self.send(webhook.as_ref(), payload).await,
                None => debug!("Webhook routing matched but no webhook sink is configured"),
            }
        }
    }

    async fn send(&self, sink: &dyn Sink, payload: &str) {
        match tokio::time::timeout(self.timeout, sink.deliver(payload)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(sink = sink.name(), error = %e, "Delivery failed"),
            Err(_) => {
                warn!(sink = sink.name(), timeout = ?self.timeout, "Delivery timed out")
            }
        }
    }
}
