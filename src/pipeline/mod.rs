//! Event routing pipeline.
//!
//! Every source message flows through:
//! 1. `classify` — self-filter, blacklist gate, forward/webhook gates
//! 2. `flatten` — labeled text views (forward + diagnostic)
//! 3. `Dispatcher::dispatch` — best-effort delivery to the enabled sinks
//!
//! Rule tables are built once at startup and injected; classification and
//! rendering are pure functions, safe under concurrent events without
//! synchronization.

pub mod classify;
pub mod dispatch;
pub mod render;
pub mod rules;
pub mod types;
