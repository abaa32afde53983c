//! Webhook sink — POSTs rendered payloads to one configured endpoint.

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::pipeline::dispatch::Sink;

/// Webhook sink — best-effort POST of each routed payload.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Sink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, payload: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({ "content": payload });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "webhook".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(ChannelError::SendFailed {
                name: "webhook".into(),
                reason: format!("endpoint returned {}", resp.status()),
            });
        }

        Ok(())
    }
}
