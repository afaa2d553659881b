//! Refresh-cycle orchestration.
//!
//! One cycle: snapshot tracked channels, fetch their status in one pass,
//! render, and conditionally apply through the host. Channels whose fetch
//! failed are skipped for the cycle so a transient API error never flips
//! a displayed online label to offline.
//!
//! Cycles never overlap: a single-flight guard drops any trigger that
//! fires while a cycle is in flight. The next timer tick catches up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::prefs::Preferences;
use crate::sync::host::HostClient;
use crate::sync::registry::{self, TrackedChannel};
use crate::sync::render::{self, DisplayOptions};
use crate::twitch::{StatusFetch, StatusReport};

/// Counts for one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Tracked channels considered this cycle.
    pub channels: usize,
    /// Channels whose topic or tab actually changed.
    pub updated: usize,
    /// Channels skipped because their status could not be fetched.
    pub unknown: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed(RefreshSummary),
    /// Dropped by the single-flight guard; a cycle was already running.
    Skipped,
}

pub struct SyncEngine {
    fetcher: Arc<dyn StatusFetch>,
    host: Arc<dyn HostClient>,
    prefs: Preferences,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a cycle ends, on every exit path.
struct Flight<'a>(&'a AtomicBool);

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    pub fn new(fetcher: Arc<dyn StatusFetch>, host: Arc<dyn HostClient>, prefs: Preferences) -> Self {
        Self {
            fetcher,
            host,
            prefs,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Refresh every tracked channel. Returns `Skipped` without touching
    /// anything if a cycle is already in flight.
    pub async fn refresh_all(&self) -> RefreshOutcome {
        let Some(flight) = self.begin() else {
            debug!("refresh already in flight, dropping trigger");
            return RefreshOutcome::Skipped;
        };

        let tracked = self.tracked();
        let summary = self.fetch_and_apply(&tracked).await;
        drop(flight);

        info!(
            channels = summary.channels,
            updated = summary.updated,
            unknown = summary.unknown,
            "refresh cycle complete"
        );
        RefreshOutcome::Completed(summary)
    }

    /// Refresh a single channel, typically right after joining it, so the
    /// label is correct before any other activity. Shares the
    /// single-flight guard with [`refresh_all`]: a join that lands
    /// mid-cycle is dropped and the running or next cycle covers it.
    pub async fn refresh_one(&self, login: &str) -> RefreshOutcome {
        let Some(flight) = self.begin() else {
            debug!(%login, "refresh in flight, dropping join-triggered refresh");
            return RefreshOutcome::Skipped;
        };

        let login = login.to_lowercase();
        let tracked: Vec<TrackedChannel> = self
            .tracked()
            .into_iter()
            .filter(|t| t.login == login)
            .collect();
        let summary = self.fetch_and_apply(&tracked).await;
        drop(flight);

        debug!(%login, updated = summary.updated, "single-channel refresh complete");
        RefreshOutcome::Completed(summary)
    }

    fn begin(&self) -> Option<Flight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| Flight(&self.in_flight))
    }

    fn tracked(&self) -> Vec<TrackedChannel> {
        let base_domain = self.prefs.get_str("twitch_base_domain", "twitch.tv");
        registry::tracked_channels(&self.host.list_open_rooms(), &base_domain)
    }

    async fn fetch_and_apply(&self, tracked: &[TrackedChannel]) -> RefreshSummary {
        if tracked.is_empty() {
            return RefreshSummary::default();
        }
        let logins: Vec<String> = tracked.iter().map(|t| t.login.clone()).collect();
        let report = self.fetcher.fetch_status(&logins).await;
        self.apply(tracked, &report)
    }

    /// Apply rendered labels for every channel with a known status. A
    /// fetch failure for one channel never aborts the rest of the batch.
    fn apply(&self, tracked: &[TrackedChannel], report: &StatusReport) -> RefreshSummary {
        let opts = DisplayOptions::from_prefs(&self.prefs);
        let mut summary = RefreshSummary {
            channels: tracked.len(),
            ..Default::default()
        };

        for channel in tracked {
            let Some(status) = report.statuses.get(&channel.login) else {
                // Status unknown: leave the displayed labels alone.
                summary.unknown += 1;
                continue;
            };

            let label = render::render(&channel.login, Some(status), &opts);
            let mut touched = false;

            if opts.modify_topic {
                let current = self.host.displayed_topic(&channel.room);
                if render::should_apply(current.as_deref(), &label.topic) {
                    self.host.set_topic(&channel.room, &label.topic);
                    touched = true;
                }
            }
            if opts.modify_tab {
                let current = self.host.displayed_tab(&channel.room);
                if render::should_apply(current.as_deref(), &label.tab) {
                    self.host.set_tab_label(&channel.room, &label.tab);
                    touched = true;
                }
            }
            if touched {
                summary.updated += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPrefStore, Preferences};
    use crate::sync::host::RoomHandle;
    use crate::twitch::ChannelStatus;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeHost {
        rooms: Mutex<Vec<RoomHandle>>,
        topics: Mutex<HashMap<String, String>>,
        tabs: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
    }

    impl FakeHost {
        fn with_rooms(rooms: &[(&str, &str)]) -> Arc<Self> {
            let host = Self::default();
            *host.rooms.lock().unwrap() = rooms
                .iter()
                .map(|(name, server)| RoomHandle {
                    name: name.to_string(),
                    server_host: server.to_string(),
                })
                .collect();
            Arc::new(host)
        }

        fn topic(&self, room: &str) -> Option<String> {
            self.topics.lock().unwrap().get(room).cloned()
        }

        fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl HostClient for FakeHost {
        fn list_open_rooms(&self) -> Vec<RoomHandle> {
            self.rooms.lock().unwrap().clone()
        }
        fn displayed_topic(&self, room: &str) -> Option<String> {
            self.topics.lock().unwrap().get(room).cloned()
        }
        fn displayed_tab(&self, room: &str) -> Option<String> {
            self.tabs.lock().unwrap().get(room).cloned()
        }
        fn set_topic(&self, room: &str, text: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.topics
                .lock()
                .unwrap()
                .insert(room.to_string(), text.to_string());
        }
        fn set_tab_label(&self, room: &str, text: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.tabs
                .lock()
                .unwrap()
                .insert(room.to_string(), text.to_string());
        }
    }

    /// Serves canned live records; every login in `fail` reports as a
    /// failed fetch.
    #[derive(Default)]
    struct FakeFetch {
        live: HashMap<String, ChannelStatus>,
        fail: HashSet<String>,
    }

    impl FakeFetch {
        fn with_live(records: &[(&str, &str, &str, &str)]) -> Self {
            let live = records
                .iter()
                .map(|(login, name, title, category)| {
                    (
                        login.to_string(),
                        ChannelStatus {
                            login: login.to_string(),
                            is_live: true,
                            display_name: name.to_string(),
                            category: category.to_string(),
                            title: title.to_string(),
                        },
                    )
                })
                .collect();
            Self {
                live,
                fail: HashSet::new(),
            }
        }

        fn failing(logins: &[&str]) -> Self {
            Self {
                live: HashMap::new(),
                fail: logins.iter().map(|l| l.to_string()).collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl StatusFetch for FakeFetch {
        async fn fetch_status(&self, logins: &[String]) -> StatusReport {
            let mut report = StatusReport::default();
            for login in logins {
                if self.fail.contains(login) {
                    report.failed.push(login.clone());
                } else {
                    let status = self
                        .live
                        .get(login)
                        .cloned()
                        .unwrap_or_else(|| ChannelStatus::offline(login));
                    report.statuses.insert(login.clone(), status);
                }
            }
            report
        }
    }

    /// Blocks inside fetch_status until released, to hold a cycle open.
    struct BlockingFetch {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl StatusFetch for BlockingFetch {
        async fn fetch_status(&self, logins: &[String]) -> StatusReport {
            self.started.notify_one();
            self.release.notified().await;
            let mut report = StatusReport::default();
            for login in logins {
                report
                    .statuses
                    .insert(login.clone(), ChannelStatus::offline(login));
            }
            report
        }
    }

    fn seeded_prefs() -> Preferences {
        let prefs = Preferences::new(Arc::new(MemoryPrefStore::default()));
        prefs.seed_defaults();
        prefs
    }

    fn engine(fetcher: impl StatusFetch + 'static, host: Arc<FakeHost>) -> SyncEngine {
        SyncEngine::new(Arc::new(fetcher), host, seeded_prefs())
    }

    #[tokio::test]
    async fn end_to_end_live_and_offline() {
        let host = FakeHost::with_rooms(&[
            ("#alice", "irc.chat.twitch.tv"),
            ("#bob", "irc.chat.twitch.tv"),
        ]);
        let fetch = FakeFetch::with_live(&[(
            "alice",
            "Alice",
            "Design review",
            "Science & Technology",
        )]);
        let engine = engine(fetch, host.clone());

        let outcome = engine.refresh_all().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshSummary {
                channels: 2,
                updated: 2,
                unknown: 0
            })
        );
        assert_eq!(
            host.topic("#alice").as_deref(),
            Some("■Alice | Design review | Science & Technology")
        );
        assert_eq!(host.topic("#bob").as_deref(), Some("□bob⟶Stream is offline"));
        assert_eq!(host.tabs.lock().unwrap().get("#alice").unwrap(), "■Alice");
        assert_eq!(host.tabs.lock().unwrap().get("#bob").unwrap(), "□bob");
    }

    #[tokio::test]
    async fn total_fetch_failure_leaves_labels_untouched() {
        let host = FakeHost::with_rooms(&[
            ("#a", "irc.chat.twitch.tv"),
            ("#b", "irc.chat.twitch.tv"),
        ]);
        host.set_topic("#a", "■A | live | thing");
        host.set_topic("#b", "old topic");
        let before = host.write_count();

        let engine = engine(FakeFetch::failing(&["a", "b"]), host.clone());
        let outcome = engine.refresh_all().await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshSummary {
                channels: 2,
                updated: 0,
                unknown: 2
            })
        );
        assert_eq!(host.write_count(), before);
        assert_eq!(host.topic("#a").as_deref(), Some("■A | live | thing"));
        assert_eq!(host.topic("#b").as_deref(), Some("old topic"));
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let host = FakeHost::with_rooms(&[
            ("#a", "irc.chat.twitch.tv"),
            ("#b", "irc.chat.twitch.tv"),
        ]);
        host.set_topic("#a", "■A | previously live | game");
        let mut fetch = FakeFetch::with_live(&[("b", "B", "t", "c")]);
        fetch.fail.insert("a".to_string());

        let engine = engine(fetch, host.clone());
        let outcome = engine.refresh_all().await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshSummary {
                channels: 2,
                updated: 1,
                unknown: 1
            })
        );
        // a untouched, b applied
        assert_eq!(host.topic("#a").as_deref(), Some("■A | previously live | game"));
        assert_eq!(host.topic("#b").as_deref(), Some("■B | t | c"));
    }

    #[tokio::test]
    async fn second_cycle_with_unchanged_status_writes_nothing() {
        let host = FakeHost::with_rooms(&[("#alice", "irc.chat.twitch.tv")]);
        let fetch = FakeFetch::with_live(&[("alice", "Alice", "t", "c")]);
        let engine = SyncEngine::new(Arc::new(fetch), host.clone(), seeded_prefs());

        engine.refresh_all().await;
        let after_first = host.write_count();
        assert!(after_first > 0);

        let outcome = engine.refresh_all().await;
        assert_eq!(host.write_count(), after_first);
        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshSummary {
                channels: 1,
                updated: 0,
                unknown: 0
            })
        );
    }

    #[tokio::test]
    async fn untracked_rooms_are_ignored() {
        let host = FakeHost::with_rooms(&[
            ("#rustlang", "irc.example.org"),
            ("#alice", "irc.chat.twitch.tv"),
        ]);
        let engine = engine(FakeFetch::default(), host.clone());

        let outcome = engine.refresh_all().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshSummary {
                channels: 1,
                updated: 1,
                unknown: 0
            })
        );
        assert!(host.topic("#rustlang").is_none());
    }

    #[tokio::test]
    async fn no_tracked_rooms_completes_without_fetching() {
        struct PanicFetch;
        #[async_trait::async_trait]
        impl StatusFetch for PanicFetch {
            async fn fetch_status(&self, _logins: &[String]) -> StatusReport {
                panic!("fetcher must not be called with no tracked rooms");
            }
        }

        let host = FakeHost::with_rooms(&[("#rustlang", "irc.example.org")]);
        let engine = SyncEngine::new(Arc::new(PanicFetch), host, seeded_prefs());
        assert_eq!(
            engine.refresh_all().await,
            RefreshOutcome::Completed(RefreshSummary::default())
        );
    }

    #[tokio::test]
    async fn refresh_one_touches_only_its_channel() {
        let host = FakeHost::with_rooms(&[
            ("#alice", "irc.chat.twitch.tv"),
            ("#bob", "irc.chat.twitch.tv"),
        ]);
        let fetch = FakeFetch::with_live(&[("alice", "Alice", "t", "c")]);
        let engine = engine(fetch, host.clone());

        let outcome = engine.refresh_one("Alice").await;
        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshSummary {
                channels: 1,
                updated: 1,
                unknown: 0
            })
        );
        assert!(host.topic("#alice").is_some());
        assert!(host.topic("#bob").is_none());
    }

    #[tokio::test]
    async fn label_toggles_gate_independently() {
        let host = FakeHost::with_rooms(&[("#alice", "irc.chat.twitch.tv")]);
        let prefs = seeded_prefs();
        prefs.set("modify_topic", "false").unwrap();
        let fetch = FakeFetch::with_live(&[("alice", "Alice", "t", "c")]);
        let engine = SyncEngine::new(Arc::new(fetch), host.clone(), prefs);

        engine.refresh_all().await;
        assert!(host.topic("#alice").is_none());
        assert_eq!(host.tabs.lock().unwrap().get("#alice").unwrap(), "■Alice");
    }

    #[tokio::test]
    async fn overlapping_refresh_is_dropped() {
        let host = FakeHost::with_rooms(&[("#alice", "irc.chat.twitch.tv")]);
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let fetch = BlockingFetch {
            started: started.clone(),
            release: release.clone(),
        };
        let engine = Arc::new(SyncEngine::new(Arc::new(fetch), host, seeded_prefs()));

        let running = engine.clone();
        let first = tokio::spawn(async move { running.refresh_all().await });
        started.notified().await;

        // First cycle is parked inside the fetcher; both entry points
        // must drop out.
        assert_eq!(engine.refresh_all().await, RefreshOutcome::Skipped);
        assert_eq!(engine.refresh_one("alice").await, RefreshOutcome::Skipped);

        release.notify_one();
        assert!(matches!(
            first.await.unwrap(),
            RefreshOutcome::Completed(_)
        ));

        // Guard released: the next trigger runs again.
        release.notify_one();
        assert!(matches!(
            engine.refresh_all().await,
            RefreshOutcome::Completed(_)
        ));
    }
}
