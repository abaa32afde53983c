//! Discord source — serenity gateway glue driving the routing pipeline.
//!
//! Pure I/O: converts each incoming message into an `Event`, hands it to
//! the classifier, and dispatches the rendered payload. Every routing
//! decision lives in `pipeline`.

use std::sync::Arc;

use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use serenity::http::Http;
use tracing::{debug, info};

use crate::error::ChannelError;
use crate::pipeline::classify::classify;
use crate::pipeline::dispatch::Dispatcher;
use crate::pipeline::render::flatten;
use crate::pipeline::rules::RuleTable;
use crate::pipeline::types::{Embed, EmbedField, Event};

/// Gateway intents the bridge needs.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Handler for Discord gateway events.
pub struct BridgeHandler {
    rules: Arc<RuleTable>,
    dispatcher: Arc<Dispatcher>,
    debug_log: bool,
}

impl BridgeHandler {
    pub fn new(rules: Arc<RuleTable>, dispatcher: Arc<Dispatcher>, debug_log: bool) -> Self {
        Self {
            rules,
            dispatcher,
            debug_log,
        }
    }
}

#[async_trait]
impl EventHandler for BridgeHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "Discord session ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let self_id = ctx.cache.current_user().id.to_string();
        let event = to_event(&ctx, &msg);

        let Some(decision) = classify(&event, &self_id, &self.rules) else {
            // Own message; never rendered, never dispatched.
            return;
        };

        let views = flatten(&event);

        if self.debug_log {
            info!("{}", views.diagnostic);
        }

        debug!(
            guild = %event.guild_id,
            channel = %event.channel_id,
            forward = decision.forward,
            webhook = decision.webhook,
            "Event classified"
        );

        self.dispatcher.dispatch(decision, &views.forward).await;
    }
}

/// Convert a serenity message into the pipeline's event type.
///
/// Display names come from the gateway cache; a cache miss leaves them
/// unset and rendering proceeds with ids only.
fn to_event(ctx: &Context, msg: &Message) -> Event {
    let (guild_name, channel_name) = match msg.guild_id {
        Some(guild_id) => match ctx.cache.guild(guild_id) {
            Some(guild) => (
                Some(guild.name.clone()),
                guild.channels.get(&msg.channel_id).map(|c| c.name.clone()),
            ),
            None => (None, None),
        },
        None => (None, None),
    };

    Event {
        author_id: msg.author.id.to_string(),
        author_name: msg.author.name.clone(),
        guild_id: msg.guild_id.map(|g| g.to_string()).unwrap_or_default(),
        guild_name,
        channel_id: msg.channel_id.to_string(),
        channel_name,
        content: msg.content.clone(),
        attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
        embeds: msg.embeds.iter().map(to_embed).collect(),
    }
}

fn to_embed(embed: &serenity::all::Embed) -> Embed {
    Embed {
        url: embed.url.clone(),
        title: embed.title.clone(),
        description: embed.description.clone(),
        image_url: embed.image.as_ref().map(|i| i.url.clone()),
        video_url: embed.video.as_ref().map(|v| v.url.clone()),
        provider_url: embed.provider.as_ref().and_then(|p| p.url.clone()),
        footer_text: embed.footer.as_ref().map(|f| f.text.clone()),
        fields: embed
            .fields
            .iter()
            .map(|f| EmbedField {
                name: f.name.clone(),
                value: f.value.clone(),
            })
            .collect(),
    }
}

/// Connect over REST, print every guild and its channels, and return.
///
/// Operator inspection only: no event routing, no state changes.
pub async fn list_guilds(token: &str) -> Result<(), ChannelError> {
    let http = Http::new(token);

    let user = http
        .get_current_user()
        .await
        .map_err(|e| ChannelError::AuthFailed {
            name: "discord".into(),
            reason: e.to_string(),
        })?;
    info!(bot_name = %user.name, "Connected to Discord");

    let guilds = http
        .get_guilds(None, None)
        .await
        .map_err(|e| ChannelError::StartupFailed {
            name: "discord".into(),
            reason: e.to_string(),
        })?;

    for guild in guilds {
        println!("-> Guild {} ({})", guild.name, guild.id);

        let channels =
            http.get_channels(guild.id)
                .await
                .map_err(|e| ChannelError::StartupFailed {
                    name: "discord".into(),
                    reason: e.to_string(),
                })?;

        for channel in channels {
            println!("    -> Channel {} ({})", channel.name, channel.id);
        }
    }

    Ok(())
}
