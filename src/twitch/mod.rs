//! Twitch Helix status types.

pub mod api;

use std::collections::HashMap;

pub use api::HelixClient;

/// Live/offline snapshot for one channel, keyed by the canonical lowercase
/// login name. Built fresh each refresh cycle and discarded after labels
/// are applied.
///
/// When `is_live` is false, `category` and `title` are always empty —
/// offline labels are composed from preferences, never from stale API
/// data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub login: String,
    pub is_live: bool,
    pub display_name: String,
    pub category: String,
    pub title: String,
}

impl ChannelStatus {
    /// Fallback status when the API cleanly reports no live stream, or
    /// when no record is available at all. The login doubles as the
    /// display name.
    pub fn offline(login: &str) -> Self {
        Self {
            login: login.to_string(),
            is_live: false,
            display_name: login.to_string(),
            category: String::new(),
            title: String::new(),
        }
    }
}

/// Result of one `fetch_status` pass. Logins whose request failed are in
/// `failed` and absent from `statuses`: their state is unknown, which is
/// distinct from a confirmed offline entry.
#[derive(Debug, Default)]
pub struct StatusReport {
    pub statuses: HashMap<String, ChannelStatus>,
    pub failed: Vec<String>,
}

/// Status source abstraction so the engine can run against a fake in
/// tests.
#[async_trait::async_trait]
pub trait StatusFetch: Send + Sync {
    async fn fetch_status(&self, logins: &[String]) -> StatusReport;
}
