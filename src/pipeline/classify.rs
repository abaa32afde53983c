//! Event classification — decides which sinks receive an event.
//!
//! Two sequential gates, then two independent routing checks:
//! 1. Self-filter: the bridge's own messages are discarded outright.
//! 2. Blacklist: a match denies everything, whatever the other tables say.
//! 3. Forward gate: user allow-list OR listen rules.
//! 4. Webhook gate: webhook-listen rules, independent of the forward gate.
//!
//! Pure and infallible: unknown scopes simply fail to match.

use crate::pipeline::rules::RuleTable;
use crate::pipeline::types::{Event, RoutingDecision};

/// Classify one event against the rule tables.
///
/// Returns `None` for self-authored events — those never produce a
/// decision, a diagnostic record, or a sink call.
pub fn classify(event: &Event, self_id: &str, rules: &RuleTable) -> Option<RoutingDecision> {
    if event.author_id == self_id {
        return None;
    }

    if rules.blacklist.matches(&event.guild_id, &event.channel_id) {
        return Some(RoutingDecision::DENY);
    }

    let forward = rules.users.matches(&event.author_id)
        || rules.listen.matches(&event.guild_id, &event.channel_id);
    let webhook = rules.webhook.matches(&event.guild_id, &event.channel_id);

    Some(RoutingDecision { forward, webhook })
}
