use crate::app::rooms::RoomTable;
use crate::config::AppConfig;
use crate::prefs::Preferences;
use crate::sync::RefreshSummary;
use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;

/// Which scrollback a message belongs to: the client status buffer or a
/// joined room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferKey {
    Status,
    Room(String),
}

#[derive(Debug, Clone)]
pub struct Message {
    pub timestamp: String,
    pub sender: String,
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    Normal,
    Action,
    System,
    Error,
    Join,
    Part,
}

#[derive(Debug, Default)]
pub struct Buffer {
    pub messages: Vec<Message>,
    pub scroll_offset: usize,
    pub unread_count: usize,
}

impl Buffer {
    pub fn add_message(&mut self, msg: Message, max_scrollback: usize) {
        self.messages.push(msg);
        if self.messages.len() > max_scrollback {
            self.messages.remove(0);
            if self.scroll_offset > 0 {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Input,
    MessageArea,
}

pub struct AppState {
    pub config: AppConfig,
    pub prefs: Preferences,
    /// Shared with the sync engine, which mutates topics and tab labels
    /// behind our back; the UI re-reads it every frame.
    pub rooms: Arc<RoomTable>,
    pub buffers: HashMap<BufferKey, Buffer>,
    pub active_buffer: BufferKey,
    pub input: InputState,
    pub focus: FocusPanel,
    pub nickname: String,
    pub status: ConnectionStatus,
    pub last_refresh: Option<(String, RefreshSummary)>,
    pub timestamp_format: String,
    pub tick_count: u64,
    pub dirty: bool,
    pub should_quit: bool,
    pub quit_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, prefs: Preferences, rooms: Arc<RoomTable>, nickname: String) -> Self {
        let timestamp_format = config.ui.timestamp_format.clone();
        let mut buffers = HashMap::new();
        buffers.insert(BufferKey::Status, Buffer::default());
        Self {
            config,
            prefs,
            rooms,
            buffers,
            active_buffer: BufferKey::Status,
            input: InputState::default(),
            focus: FocusPanel::Input,
            nickname,
            status: ConnectionStatus::Connecting,
            last_refresh: None,
            timestamp_format,
            tick_count: 0,
            dirty: true,
            should_quit: false,
            quit_message: None,
        }
    }

    pub fn ensure_buffer(&mut self, key: BufferKey) {
        self.buffers.entry(key).or_default();
    }

    pub fn set_active_buffer(&mut self, key: BufferKey) {
        self.ensure_buffer(key.clone());
        if let Some(buf) = self.buffers.get_mut(&key) {
            buf.unread_count = 0;
        }
        self.active_buffer = key;
        self.dirty = true;
    }

    pub fn active_room(&self) -> Option<&str> {
        match &self.active_buffer {
            BufferKey::Room(name) => Some(name),
            BufferKey::Status => None,
        }
    }

    pub fn add_message_to_buffer(&mut self, key: &BufferKey, msg: Message) {
        let max = self.config.ui.max_scrollback;
        let is_active = *key == self.active_buffer;
        let buf = self.buffers.entry(key.clone()).or_default();
        buf.add_message(msg, max);
        if !is_active {
            buf.unread_count += 1;
        }
        self.dirty = true;
    }

    pub fn system_message(&mut self, key: &BufferKey, text: String) {
        let msg = Message {
            timestamp: Local::now().format(&self.timestamp_format).to_string(),
            sender: String::new(),
            text,
            kind: MessageKind::System,
        };
        self.add_message_to_buffer(key, msg);
    }

    pub fn error_message(&mut self, key: &BufferKey, text: String) {
        let msg = Message {
            timestamp: Local::now().format(&self.timestamp_format).to_string(),
            sender: String::new(),
            text,
            kind: MessageKind::Error,
        };
        self.add_message_to_buffer(key, msg);
    }

    /// Buffer order as shown in the tab strip: status first, then rooms in
    /// join order.
    pub fn buffer_order(&self) -> Vec<BufferKey> {
        let mut order = vec![BufferKey::Status];
        order.extend(
            self.rooms
                .snapshot()
                .into_iter()
                .map(|r| BufferKey::Room(r.name)),
        );
        order
    }

    pub fn next_buffer(&mut self) {
        self.step_buffer(1);
    }

    pub fn prev_buffer(&mut self) {
        self.step_buffer(-1);
    }

    fn step_buffer(&mut self, dir: isize) {
        let order = self.buffer_order();
        if order.is_empty() {
            return;
        }
        let current = order
            .iter()
            .position(|k| *k == self.active_buffer)
            .unwrap_or(0) as isize;
        let next = (current + dir).rem_euclid(order.len() as isize) as usize;
        self.set_active_buffer(order[next].clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPrefStore, Preferences};

    fn state() -> AppState {
        let rooms = Arc::new(RoomTable::default());
        AppState::new(
            AppConfig::default(),
            Preferences::new(Arc::new(MemoryPrefStore::default())),
            rooms,
            "tester".into(),
        )
    }

    #[test]
    fn tab_cycling_wraps_both_ways() {
        let mut s = state();
        s.rooms.insert("#alice", "irc.chat.twitch.tv");
        s.rooms.insert("#bob", "irc.chat.twitch.tv");

        assert_eq!(s.active_buffer, BufferKey::Status);
        s.next_buffer();
        assert_eq!(s.active_buffer, BufferKey::Room("#alice".into()));
        s.prev_buffer();
        assert_eq!(s.active_buffer, BufferKey::Status);
        s.prev_buffer();
        assert_eq!(s.active_buffer, BufferKey::Room("#bob".into()));
    }

    #[test]
    fn unread_counts_track_inactive_buffers() {
        let mut s = state();
        s.rooms.insert("#alice", "irc.chat.twitch.tv");
        let key = BufferKey::Room("#alice".into());
        s.system_message(&key, "hi".into());
        assert_eq!(s.buffers[&key].unread_count, 1);

        s.set_active_buffer(key.clone());
        assert_eq!(s.buffers[&key].unread_count, 0);
        s.system_message(&key, "hi again".into());
        assert_eq!(s.buffers[&key].unread_count, 0);
    }

    #[test]
    fn scrollback_is_bounded() {
        let mut s = state();
        s.config.ui.max_scrollback = 3;
        let key = BufferKey::Status;
        for i in 0..5 {
            s.system_message(&key, format!("m{}", i));
        }
        let buf = &s.buffers[&key];
        assert_eq!(buf.messages.len(), 3);
        assert_eq!(buf.messages[0].text, "m2");
    }
}
