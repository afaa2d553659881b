//! Sync preferences.
//!
//! All runtime-tunable settings live in an external key-value store under
//! the fixed `cw_` namespace. Defaults are seeded once per key: seeding
//! never overwrites a value the user has set, so `/set` survives restarts.

pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;
pub use store::{FilePrefStore, PrefStore};
#[cfg(test)]
pub use store::MemoryPrefStore;

/// Namespace prefix for every key this application owns in the store.
pub const PREFIX: &str = "cw_";

/// Preference names and their seeded defaults. A name is "known" once it
/// exists in the store, which after seeding means this table plus anything
/// the user added.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("twitch_api_root", "https://api.twitch.tv/helix"),
    ("api_token", ""),
    ("api_client_id", "q6batx0epp608isickayubi39itsckt"),
    ("twitch_base_domain", "twitch.tv"),
    ("bullet_offline", "\u{25A1}"),
    ("bullet_online", "\u{25A0}"),
    ("offline_text", "\u{27F6}Stream is offline"),
    ("modify_topic", "true"),
    ("modify_tab", "true"),
    ("refresh_rate", "600"),
    ("api_batch_size", "100"),
    ("api_timeout_secs", "10"),
];

pub fn prefs_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crabwatch")
        .join("prefs.toml")
}

/// Typed, namespaced view over a [`PrefStore`]. Cheap to clone; every
/// accessor reads the store so `/set` takes effect on the next cycle.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn PrefStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn PrefStore>) -> Self {
        Self { store }
    }

    /// Fill absent keys with defaults. Idempotent: present keys, user-set
    /// or previously seeded, are left untouched.
    pub fn seed_defaults(&self) {
        for (name, value) in DEFAULTS {
            let key = format!("{}{}", PREFIX, name);
            if self.store.get(&key).is_none() {
                self.store.set(&key, value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.store.get(&format!("{}{}", PREFIX, name))
    }

    /// Set a known preference. Rejects names absent from the store so a
    /// typo cannot create a dead key.
    pub fn set(&self, name: &str, value: &str) -> Result<(), Error> {
        let key = format!("{}{}", PREFIX, name);
        if self.store.get(&key).is_none() {
            return Err(Error::UnknownPreference(name.to_string()));
        }
        self.store.set(&key, value);
        Ok(())
    }

    /// Every preference under the namespace, prefix stripped, sorted by
    /// name.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .store
            .keys()
            .into_iter()
            .filter_map(|key| {
                let name = key.strip_prefix(PREFIX)?.to_string();
                let value = self.store.get(&key)?;
                Some((name, value))
            })
            .collect();
        out.sort();
        out
    }

    pub fn get_str(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(v) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
            None => default,
        }
    }

    pub fn get_u64(&self, name: &str, default: u64) -> u64 {
        self.get(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
