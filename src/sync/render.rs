//! Label rendering and the idempotence guard.
//!
//! Pure functions of a status snapshot and the display preferences. The
//! engine applies a rendered label only when [`should_apply`] says the
//! displayed text differs, so an unchanged status never produces an
//! externally-visible update.

use crate::prefs::Preferences;
use crate::twitch::ChannelStatus;

/// Display preferences snapshotted once per refresh cycle.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub bullet_online: String,
    pub bullet_offline: String,
    pub offline_text: String,
    pub modify_topic: bool,
    pub modify_tab: bool,
}

impl DisplayOptions {
    pub fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            bullet_online: prefs.get_str("bullet_online", "\u{25A0}"),
            bullet_offline: prefs.get_str("bullet_offline", "\u{25A1}"),
            offline_text: prefs.get_str("offline_text", "\u{27F6}Stream is offline"),
            modify_topic: prefs.get_bool("modify_topic", true),
            modify_tab: prefs.get_bool("modify_tab", true),
        }
    }
}

/// Desired topic and tab text for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLabel {
    pub topic: String,
    pub tab: String,
}

/// Compute the desired labels. An absent status renders the same as a
/// confirmed offline one; "unknown" channels never reach this function.
pub fn render(login: &str, status: Option<&ChannelStatus>, opts: &DisplayOptions) -> RenderedLabel {
    match status {
        Some(s) if s.is_live => RenderedLabel {
            topic: format!(
                "{}{} | {} | {}",
                opts.bullet_online, s.display_name, s.title, s.category
            ),
            tab: format!("{}{}", opts.bullet_online, s.display_name),
        },
        _ => RenderedLabel {
            topic: format!("{}{}{}", opts.bullet_offline, login, opts.offline_text),
            tab: format!("{}{}", opts.bullet_offline, login),
        },
    }
}

/// Apply only when the desired text differs from what is currently
/// displayed. An unobservable current value always applies.
pub fn should_apply(current: Option<&str>, desired: &str) -> bool {
    current != Some(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;
    use std::sync::Arc;

    fn opts() -> DisplayOptions {
        let prefs = Preferences::new(Arc::new(MemoryPrefStore::default()));
        prefs.seed_defaults();
        DisplayOptions::from_prefs(&prefs)
    }

    fn live(login: &str, name: &str, title: &str, category: &str) -> ChannelStatus {
        ChannelStatus {
            login: login.to_string(),
            is_live: true,
            display_name: name.to_string(),
            category: category.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn online_label_matches_expected_format() {
        let status = live("alice", "Alice", "Design review", "Science & Technology");
        let label = render("alice", Some(&status), &opts());
        assert_eq!(label.topic, "■Alice | Design review | Science & Technology");
        assert_eq!(label.tab, "■Alice");
    }

    #[test]
    fn offline_and_absent_render_identically() {
        let offline = ChannelStatus::offline("bob");
        let from_status = render("bob", Some(&offline), &opts());
        let from_absent = render("bob", None, &opts());
        assert_eq!(from_status, from_absent);
        assert_eq!(from_status.topic, "□bob⟶Stream is offline");
        assert_eq!(from_status.tab, "□bob");
    }

    #[test]
    fn second_render_is_idempotent() {
        let status = live("alice", "Alice", "t", "c");
        let opts = opts();
        let first = render("alice", Some(&status), &opts);
        assert!(should_apply(None, &first.topic));

        // Pretend the host applied it, then render again unchanged.
        let second = render("alice", Some(&status), &opts);
        assert!(!should_apply(Some(first.topic.as_str()), &second.topic));
        assert!(!should_apply(Some(first.tab.as_str()), &second.tab));
    }

    #[test]
    fn online_to_offline_transition_applies() {
        let opts = opts();
        let online = render("alice", Some(&live("alice", "Alice", "t", "c")), &opts);
        let offline = render("alice", None, &opts);
        assert!(offline.topic.contains(&opts.bullet_offline));
        assert!(offline.topic.contains("Stream is offline"));
        assert!(should_apply(Some(online.topic.as_str()), &offline.topic));
    }

    #[test]
    fn bullets_and_marker_are_configuration_driven() {
        let prefs = Preferences::new(Arc::new(MemoryPrefStore::default()));
        prefs.seed_defaults();
        prefs.set("bullet_online", "[LIVE] ").unwrap();
        prefs.set("bullet_offline", "[off] ").unwrap();
        prefs.set("offline_text", " (not streaming)").unwrap();
        let opts = DisplayOptions::from_prefs(&prefs);

        let label = render("bob", None, &opts);
        assert_eq!(label.topic, "[off] bob (not streaming)");
        let label = render("alice", Some(&live("alice", "Alice", "t", "c")), &opts);
        assert_eq!(label.tab, "[LIVE] Alice");
    }
}
