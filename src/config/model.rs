//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the
//! box against Twitch chat.

use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Connection settings for the Twitch chat server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    /// Authenticated nickname. When absent the client connects read-only
    /// with a generated anonymous nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Channels to join at startup, with or without the `#` prefix.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls: true,
            nickname: None,
            channels: Vec::new(),
        }
    }
}

/// UI appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_max_scrollback")]
    pub max_scrollback: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            max_scrollback: default_max_scrollback(),
        }
    }
}

/// Tracing filter for the log file (overridden by `RUST_LOG`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_host() -> String {
    "irc.chat.twitch.tv".to_string()
}
fn default_port() -> u16 {
    6697
}
fn default_true() -> bool {
    true
}
fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}
fn default_max_scrollback() -> usize {
    10000
}
fn default_log_filter() -> String {
    "info,crabwatch=debug,hyper_util=warn,reqwest=warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_working_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.chat.host, "irc.chat.twitch.tv");
        assert_eq!(cfg.chat.port, 6697);
        assert!(cfg.chat.tls);
        assert!(cfg.chat.nickname.is_none());
        assert_eq!(cfg.ui.max_scrollback, 10000);
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg: AppConfig = toml::from_str(
            r##"
            [chat]
            nickname = "somebody"
            channels = ["alice", "#bob"]
            "##,
        )
        .unwrap();
        assert_eq!(cfg.chat.nickname.as_deref(), Some("somebody"));
        assert_eq!(cfg.chat.channels.len(), 2);
        assert_eq!(cfg.chat.host, "irc.chat.twitch.tv");
    }
}
