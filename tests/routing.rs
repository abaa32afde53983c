//! End-to-end routing tests: rule tables built from configuration, events
//! classified, rendered, and dispatched to recording fake sinks.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chat_bridge::config::BridgeConfig;
use chat_bridge::error::ChannelError;
use chat_bridge::pipeline::classify::classify;
use chat_bridge::pipeline::dispatch::{Dispatcher, Sink};
use chat_bridge::pipeline::render::flatten;
use chat_bridge::pipeline::rules::RuleTable;
use chat_bridge::pipeline::types::{Embed, Event};

const SELF_ID: &str = "BRIDGE";

/// Records every payload it is handed; optionally fails each delivery.
struct RecordingSink {
    name: &'static str,
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            sent: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn delivered(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    fn name(&self) -> &str {
        self.name
    }

    async fn deliver(&self, payload: &str) -> Result<(), ChannelError> {
        if self.fail {
            return Err(ChannelError::SendFailed {
                name: self.name.into(),
                reason: "forced failure".into(),
            });
        }
        self.sent.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

fn rules(listen: &[&str], blacklist: &[&str], webhook: &[&str], users: &[&str]) -> RuleTable {
    let config = BridgeConfig {
        listen_guild_channel_ids: listen.iter().map(|s| s.to_string()).collect(),
        blacklist_guild_channel_ids: blacklist.iter().map(|s| s.to_string()).collect(),
        listen_webhook_guild_channel_ids: webhook.iter().map(|s| s.to_string()).collect(),
        listen_user_ids: users.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    RuleTable::from_config(&config)
}

fn event(author: &str, guild: &str, channel: &str, content: &str) -> Event {
    Event {
        author_id: author.into(),
        author_name: "alice".into(),
        guild_id: guild.into(),
        guild_name: Some("Guild One".into()),
        channel_id: channel.into(),
        channel_name: Some("general".into()),
        content: content.into(),
        attachments: vec![],
        embeds: vec![],
    }
}

/// Run one event through the full pipeline against the given dispatcher.
async fn handle(event: &Event, table: &RuleTable, dispatcher: &Dispatcher) {
    let Some(decision) = classify(event, SELF_ID, table) else {
        return;
    };
    let views = flatten(event);
    dispatcher.dispatch(decision, &views.forward).await;
}

#[tokio::test]
async fn listened_event_reaches_relay_with_rendered_payload() {
    let relay = RecordingSink::new("relay");
    let webhook = RecordingSink::new("webhook");
    let dispatcher = Dispatcher::new(relay.clone(), Some(webhook.clone()));
    let table = rules(&["G1:C1"], &[], &[], &[]);

    handle(&event("U1", "G1", "C1", "hi there"), &table, &dispatcher).await;

    let delivered = relay.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].contains("name: alice\n"));
    assert!(delivered[0].contains("guild: Guild One\n"));
    assert!(delivered[0].contains("content:\nhi there\n"));
    assert!(webhook.delivered().is_empty());
}

#[tokio::test]
async fn unlisted_event_reaches_nothing() {
    let relay = RecordingSink::new("relay");
    let webhook = RecordingSink::new("webhook");
    let dispatcher = Dispatcher::new(relay.clone(), Some(webhook.clone()));
    let table = rules(&["G1:C1"], &[], &[], &[]);

    handle(&event("U1", "G1", "C2", "hi"), &table, &dispatcher).await;

    assert!(relay.delivered().is_empty());
    assert!(webhook.delivered().is_empty());
}

#[tokio::test]
async fn webhook_rule_routes_to_webhook_independently() {
    let relay = RecordingSink::new("relay");
    let webhook = RecordingSink::new("webhook");
    let dispatcher = Dispatcher::new(relay.clone(), Some(webhook.clone()));
    // G1:C1 goes to both sinks, G2:C2 to the webhook only.
    let table = rules(&["G1:C1"], &[], &["G1:C1", "G2:C2"], &[]);

    handle(&event("U1", "G1", "C1", "both"), &table, &dispatcher).await;
    handle(&event("U2", "G2", "C2", "hook only"), &table, &dispatcher).await;

    assert_eq!(relay.delivered().len(), 1);
    let hooks = webhook.delivered();
    assert_eq!(hooks.len(), 2);
    assert!(hooks[0].contains("both"));
    assert!(hooks[1].contains("hook only"));
}

#[tokio::test]
async fn blacklisted_event_reaches_no_sink() {
    let relay = RecordingSink::new("relay");
    let webhook = RecordingSink::new("webhook");
    let dispatcher = Dispatcher::new(relay.clone(), Some(webhook.clone()));
    let table = rules(&["G1:*"], &["G1:C1"], &["G1:*"], &["U1"]);

    handle(&event("U1", "G1", "C1", "blocked"), &table, &dispatcher).await;

    assert!(relay.delivered().is_empty());
    assert!(webhook.delivered().is_empty());
}

#[tokio::test]
async fn self_authored_event_never_dispatches() {
    let relay = RecordingSink::new("relay");
    let dispatcher = Dispatcher::new(relay.clone(), None);
    let table = rules(&["G1:*"], &[], &[], &["*"]);

    handle(&event(SELF_ID, "G1", "C1", "echo"), &table, &dispatcher).await;

    assert!(relay.delivered().is_empty());
}

#[tokio::test]
async fn allow_listed_user_forwards_from_unlisted_guild() {
    let relay = RecordingSink::new("relay");
    let dispatcher = Dispatcher::new(relay.clone(), None);
    let table = rules(&[], &[], &[], &["U9"]);

    handle(&event("U9", "G2", "C9", "vip"), &table, &dispatcher).await;
    handle(&event("U1", "G2", "C9", "not vip"), &table, &dispatcher).await;

    let delivered = relay.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].contains("vip"));
}

#[tokio::test]
async fn relay_failure_does_not_stop_webhook_delivery() {
    let relay = RecordingSink::failing("relay");
    let webhook = RecordingSink::new("webhook");
    let dispatcher = Dispatcher::new(relay, Some(webhook.clone()));
    let table = rules(&["G1:C1"], &[], &["G1:C1"], &[]);

    handle(&event("U1", "G1", "C1", "survives"), &table, &dispatcher).await;

    assert_eq!(webhook.delivered().len(), 1);
}

#[tokio::test]
async fn failed_delivery_does_not_affect_later_events() {
    let relay = RecordingSink::failing("relay");
    let webhook = RecordingSink::new("webhook");
    let dispatcher = Dispatcher::new(relay, Some(webhook.clone()));
    let table = rules(&["G1:*"], &[], &["G1:*"], &[]);

    handle(&event("U1", "G1", "C1", "first"), &table, &dispatcher).await;
    handle(&event("U2", "G1", "C2", "second"), &table, &dispatcher).await;

    let hooks = webhook.delivered();
    assert_eq!(hooks.len(), 2);
    assert!(hooks[1].contains("second"));
}

#[tokio::test]
async fn embeds_and_attachments_flow_into_the_payload() {
    let relay = RecordingSink::new("relay");
    let dispatcher = Dispatcher::new(relay.clone(), None);
    let table = rules(&["G1:C1"], &[], &[], &[]);

    let mut ev = event("U1", "G1", "C1", "look at this");
    ev.attachments = vec!["https://cdn.example/file.png".into()];
    ev.embeds = vec![Embed {
        title: Some("An article".into()),
        url: Some("https://news.example/a".into()),
        ..Default::default()
    }];

    handle(&ev, &table, &dispatcher).await;

    let delivered = relay.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].contains("attachment:\nhttps://cdn.example/file.png\n"));
    assert!(delivered[0].contains("Embed URL: https://news.example/a\n"));
    assert!(delivered[0].contains("Embed Title: An article\n"));
}
