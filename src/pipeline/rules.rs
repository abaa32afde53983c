//! Immutable routing rule tables, built once from configuration.
//!
//! Three independent scope rule sets (listen, blacklist, webhook-listen)
//! plus a flat user allow-list. Rule entries are `"<guild>:<channel>"`
//! strings; anything that does not split into exactly two parts on `':'` is
//! dropped whole. The tables never change after construction, so they are
//! shared across concurrent event handlers without locking.

use std::collections::HashMap;

use tracing::info;

use crate::config::BridgeConfig;

/// The match-any child token.
pub const WILDCARD: &str = "*";

// ── Scope rules ─────────────────────────────────────────────────────

/// Maps a guild id to the ordered channel-id list configured for it.
#[derive(Debug, Clone, Default)]
pub struct ScopeRuleSet {
    scopes: HashMap<String, Vec<String>>,
}

impl ScopeRuleSet {
    /// Build from `"<guild>:<channel>"` entries.
    ///
    /// Malformed entries (zero or more than one `':'`) are dropped without
    /// error. Insertion order and duplicates within a scope are preserved.
    /// Pure: the same entries always produce the same table.
    pub fn build<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scopes: HashMap<String, Vec<String>> = HashMap::new();
        for entry in entries {
            let parts: Vec<&str> = entry.as_ref().split(':').collect();
            if let [scope, child] = parts.as_slice() {
                scopes
                    .entry(scope.to_string())
                    .or_default()
                    .push(child.to_string());
            }
        }
        Self { scopes }
    }

    /// True when the scope is configured and its list carries the exact
    /// child or the wildcard. An absent scope never matches.
    pub fn matches(&self, scope: &str, child: &str) -> bool {
        self.scopes
            .get(scope)
            .is_some_and(|children| children.iter().any(|c| c == WILDCARD || c == child))
    }

    /// Number of configured scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// True when no scope is configured.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

// ── User allow-list ─────────────────────────────────────────────────

/// Flat, wildcard-capable user id list, evaluated independently of scope.
#[derive(Debug, Clone, Default)]
pub struct UserAllowList {
    ids: Vec<String>,
}

impl UserAllowList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// True when the list carries the wildcard or the exact id.
    pub fn matches(&self, id: &str) -> bool {
        self.ids.iter().any(|u| u == WILDCARD || u == id)
    }

    /// Number of listed ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no id is listed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ── Rule table ──────────────────────────────────────────────────────

/// All four rule structures, built once at startup and injected into the
/// classifier.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    /// Scopes whose events go to the chat-relay sink.
    pub listen: ScopeRuleSet,
    /// Scopes whose events are dropped outright, overriding everything.
    pub blacklist: ScopeRuleSet,
    /// Scopes whose events go to the webhook sink.
    pub webhook: ScopeRuleSet,
    /// Users forwarded regardless of scope rules.
    pub users: UserAllowList,
}

impl RuleTable {
    /// Build every table from the configuration lists.
    pub fn from_config(config: &BridgeConfig) -> Self {
        let table = Self {
            listen: ScopeRuleSet::build(&config.listen_guild_channel_ids),
            blacklist: ScopeRuleSet::build(&config.blacklist_guild_channel_ids),
            webhook: ScopeRuleSet::build(&config.listen_webhook_guild_channel_ids),
            users: UserAllowList::new(&config.listen_user_ids),
        };
        info!(
            listen_scopes = table.listen.len(),
            blacklist_scopes = table.blacklist.len(),
            webhook_scopes = table.webhook.len(),
            allowed_users = table.users.len(),
            "Routing tables built"
        );
        table
    }
}
