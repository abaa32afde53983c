//! Content flattening — renders an event into labeled text views.
//!
//! Sections are concatenated in a fixed order: identity, content,
//! attachments, embeds. User-supplied text passes through verbatim; no
//! escaping or truncation happens here, so a sink that parses its payload
//! as markup must escape on its own side.

use crate::pipeline::types::{Embed, Event};

/// The two text renderings of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedViews {
    /// Payload handed to the sinks.
    pub forward: String,
    /// Operator-facing record: raw ids followed by the full forward view.
    pub diagnostic: String,
}

/// Render both views of an event.
pub fn flatten(event: &Event) -> RenderedViews {
    let forward = forward_view(event);
    let diagnostic = diagnostic_view(event, &forward);
    RenderedViews { forward, diagnostic }
}

fn forward_view(event: &Event) -> String {
    let mut out = String::new();

    // Identity section renders only when both display names resolved; a
    // failed lookup skips the section, never the event.
    if let (Some(guild), Some(channel)) = (&event.guild_name, &event.channel_name) {
        out.push_str(&format!("name: {}\n", event.author_name));
        out.push_str(&format!("guild: {guild}\n"));
        out.push_str(&format!("channel: {channel}\n"));
    }

    out.push_str(&format!("content:\n{}\n", event.content));

    for url in &event.attachments {
        out.push_str(&format!("attachment:\n{url}\n"));
    }

    for embed in &event.embeds {
        embed_section(embed, &mut out);
    }

    out
}

/// One labeled line per present, non-empty embed value, in fixed order,
/// then one line per named field's value.
fn embed_section(embed: &Embed, out: &mut String) {
    let lines: [(&str, Option<&String>); 7] = [
        ("Embed URL", embed.url.as_ref()),
        ("Embed Title", embed.title.as_ref()),
        ("Embed Description", embed.description.as_ref()),
        ("Embed Image URL", embed.image_url.as_ref()),
        ("Embed Video URL", embed.video_url.as_ref()),
        ("Embed Provider URL", embed.provider_url.as_ref()),
        ("Embed Footer Text", embed.footer_text.as_ref()),
    ];

    for (label, value) in lines {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }

    for field in &embed.fields {
        out.push_str(&format!("Embed Value Text: {}\n", field.value));
    }
}

fn diagnostic_view(event: &Event, forward: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("user id: {}\n", event.author_id));
    out.push_str(&format!("user name: {}\n", event.author_name));

    if let (Some(guild), Some(channel)) = (&event.guild_name, &event.channel_name) {
        out.push_str(&format!("guild id: {}\n", event.guild_id));
        out.push_str(&format!("guild name: {guild}\n"));
        out.push_str(&format!("channel id: {}\n", event.channel_id));
        out.push_str(&format!("channel name: {channel}\n"));
    }

    out.push_str(forward);
    out
}
