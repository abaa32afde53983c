//! Shared types for the routing pipeline.

use serde::{Deserialize, Serialize};

// ── Event ───────────────────────────────────────────────────────────

/// Unified message event from the source platform.
///
/// The source glue converts its native message type into this struct; the
/// pipeline never sees platform SDK types. Events are immutable and live for
/// a single routing pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Author id (platform snowflake as a string).
    pub author_id: String,
    /// Author display name.
    pub author_name: String,
    /// Guild (scope) id; empty for direct messages.
    pub guild_id: String,
    /// Guild display name, when the lookup resolved.
    pub guild_name: Option<String>,
    /// Channel (child) id.
    pub channel_id: String,
    /// Channel display name, when the lookup resolved.
    pub channel_name: Option<String>,
    /// Raw message text.
    pub content: String,
    /// Attachment URLs, in message order.
    pub attachments: Vec<String>,
    /// Embeds, in message order.
    pub embeds: Vec<Embed>,
}

/// One embed attached to an event.
///
/// Every value is optional; the renderer emits a line only for present,
/// non-empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub provider_url: Option<String>,
    pub footer_text: Option<String>,
    /// Named fields, in embed order.
    pub fields: Vec<EmbedField>,
}

/// A (name, value) pair inside an embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

// ── Routing decision ────────────────────────────────────────────────

/// Which sinks receive an event. Both flags are false unless rule
/// evaluation explicitly enables them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Deliver the forward view to the chat-relay sink.
    pub forward: bool,
    /// Deliver the forward view to the webhook sink.
    pub webhook: bool,
}

impl RoutingDecision {
    /// Decision that reaches no sink.
    pub const DENY: Self = Self {
        forward: false,
        webhook: false,
    };
}
