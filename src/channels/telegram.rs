//! Telegram relay sink — delivers rendered payloads over the Bot API.
//!
//! One bridge, one destination chat. Payloads over the API length limit are
//! split, not truncated. Sends are plain text (no parse mode) so raw user
//! content cannot break a markup parser.

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::pipeline::dispatch::Sink;

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram relay — sends every forwarded payload to one configured chat.
pub struct TelegramRelay {
    bot_token: String,
    chat_id: i64,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramRelay {
    pub fn new(bot_token: String, chat_id: i64) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base: DEFAULT_API_BASE.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the relay at a different API host (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Send a text message, splitting anything over the API length limit.
    async fn send_message(&self, text: &str) -> Result<(), ChannelError> {
        for chunk in split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH) {
            self.send_chunk(&chunk).await?;
        }
        Ok(())
    }

    async fn send_chunk(&self, text: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!("sendMessage returned {status}: {err}"),
            });
        }

        Ok(())
    }

    /// Validate the bot token against getMe and return the bot's username.
    ///
    /// Called once at startup; a failure here is fatal.
    pub async fn health_check(&self) -> Result<String, ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(ChannelError::AuthFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            });
        }

        let data: serde_json::Value =
            resp.json().await.map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe body: {e}"),
            })?;

        Ok(data["result"]["username"]
            .as_str()
            .unwrap_or("unknown")
            .to_string())
    }
}

#[async_trait]
impl Sink for TelegramRelay {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, payload: &str) -> Result<(), ChannelError> {
        self.send_message(payload).await
    }
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let chunk = &remaining[..max_len];
        let split_at = chunk
            .rfind('\n')
            .or_else(|| chunk.rfind(' '))
            .unwrap_or(max_len);

        // Don't split at position 0 (infinite loop guard)
        let split_at = if split_at == 0 { max_len } else { split_at };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}
