//! Bridge configuration — YAML file plus environment overrides.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Bridge configuration.
///
/// Values come from a YAML file when one exists at the given path; any
/// matching environment variable then overrides the file value. List-valued
/// keys are comma-separated in env form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Discord bot token for the source session.
    pub discord_token: String,
    /// Telegram Bot API token for the relay sink.
    pub telegram_bot_token: String,
    /// Telegram chat id the relay sink delivers to.
    pub telegram_to_chat_id: i64,
    /// Log the full diagnostic view of every event.
    pub debug_log: bool,
    /// Webhook endpoint; webhook delivery is disabled when unset.
    pub webhook_url: Option<String>,
    /// `"<guild>:<channel>"` listen rules.
    pub listen_guild_channel_ids: Vec<String>,
    /// User ids forwarded regardless of scope rules.
    pub listen_user_ids: Vec<String>,
    /// `"<guild>:<channel>"` blacklist rules.
    pub blacklist_guild_channel_ids: Vec<String>,
    /// `"<guild>:<channel>"` webhook-listen rules.
    pub listen_webhook_guild_channel_ids: Vec<String>,
}

impl BridgeConfig {
    /// Load configuration: the file (if present), then env overrides.
    ///
    /// A missing file is not an error as long as env supplies the required
    /// keys; `validate` decides whether the merged result is usable.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from an env-shaped lookup.
    ///
    /// Separated from `load` so tests can drive it without mutating
    /// process-wide environment state.
    fn apply_overrides(
        &mut self,
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = get("DISCORD_TOKEN") {
            self.discord_token = v;
        }
        if let Some(v) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram_bot_token = v;
        }
        if let Some(v) = get("TELEGRAM_TO_CHATID") {
            self.telegram_to_chat_id = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TELEGRAM_TO_CHATID".into(),
                message: format!("not a chat id: {v}"),
            })?;
        }
        if let Some(v) = get("DEBUG_LOG") {
            self.debug_log = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = get("WEBHOOK_URL") {
            self.webhook_url = Some(v);
        }
        if let Some(v) = get("LISTEN_GUILD_CHANNEL_IDS") {
            self.listen_guild_channel_ids = split_list(&v);
        }
        if let Some(v) = get("LISTEN_USER_IDS") {
            self.listen_user_ids = split_list(&v);
        }
        if let Some(v) = get("BLACKLIST_GUILD_CHANNEL_IDS") {
            self.blacklist_guild_channel_ids = split_list(&v);
        }
        if let Some(v) = get("LISTEN_WEBHOOK_GUILD_CHANNEL_IDS") {
            self.listen_webhook_guild_channel_ids = split_list(&v);
        }
        Ok(())
    }

    /// Check that the credentials and the relay target are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord_token.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "discord_token".into(),
                hint: "Set it in the config file or export DISCORD_TOKEN.".into(),
            });
        }
        if self.telegram_bot_token.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "telegram_bot_token".into(),
                hint: "Set it in the config file or export TELEGRAM_BOT_TOKEN.".into(),
            });
        }
        if self.telegram_to_chat_id == 0 {
            return Err(ConfigError::MissingRequired {
                key: "telegram_to_chat_id".into(),
                hint: "Set the target chat id in the config file or export TELEGRAM_TO_CHATID."
                    .into(),
            });
        }
        Ok(())
    }
}

/// Split a comma-separated env value into trimmed, non-empty entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
