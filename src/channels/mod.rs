//! Channel glue — the platform source and the delivery sinks.
//!
//! Everything here is thin I/O; routing decisions and rendering live in
//! `pipeline`.

pub mod discord;
pub mod telegram;
pub mod webhook;

pub use discord::BridgeHandler;
pub use telegram::TelegramRelay;
pub use webhook::WebhookSink;
