//! Per-agent settings, persisted as one JSON object keyed by agent name.

pub mod schema;
pub mod store;

pub use schema::{default_allowed_inputs, AgentSettings};
pub use store::SettingsStore;
