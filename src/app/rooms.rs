//! Shared open-room table.
//!
//! The single point of truth for which rooms are open and what their
//! displayed topic and tab label currently are. The UI reads it every
//! frame, the IRC handler inserts and removes rooms, and the sync engine
//! reaches it only through the [`HostClient`] capability trait.

use std::sync::Mutex;

use crate::sync::host::{HostClient, RoomHandle};

#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    pub server_host: String,
    /// Displayed topic; `None` until something sets one.
    pub topic: Option<String>,
    /// Displayed tab label; the UI falls back to the room name.
    pub tab_label: Option<String>,
}

/// Insertion-ordered room list behind a mutex. All methods take `&self`;
/// locks are held only for the duration of one call.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: Mutex<Vec<Room>>,
}

impl RoomTable {
    pub fn insert(&self, name: &str, server_host: &str) {
        let mut rooms = self.lock();
        if rooms.iter().any(|r| r.name == name) {
            return;
        }
        rooms.push(Room {
            name: name.to_string(),
            server_host: server_host.to_string(),
            topic: None,
            tab_label: None,
        });
    }

    pub fn remove(&self, name: &str) {
        self.lock().retain(|r| r.name != name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().iter().any(|r| r.name == name)
    }

    pub fn snapshot(&self) -> Vec<Room> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Room>> {
        self.rooms.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HostClient for RoomTable {
    fn list_open_rooms(&self) -> Vec<RoomHandle> {
        self.lock()
            .iter()
            .map(|r| RoomHandle {
                name: r.name.clone(),
                server_host: r.server_host.clone(),
            })
            .collect()
    }

    fn displayed_topic(&self, room: &str) -> Option<String> {
        self.lock()
            .iter()
            .find(|r| r.name == room)
            .and_then(|r| r.topic.clone())
    }

    fn displayed_tab(&self, room: &str) -> Option<String> {
        self.lock()
            .iter()
            .find(|r| r.name == room)
            .and_then(|r| r.tab_label.clone())
    }

    fn set_topic(&self, room: &str, text: &str) {
        if let Some(r) = self.lock().iter_mut().find(|r| r.name == room) {
            r.topic = Some(text.to_string());
        }
    }

    fn set_tab_label(&self, room: &str, text: &str) {
        if let Some(r) = self.lock().iter_mut().find(|r| r.name == room) {
            r.tab_label = Some(text.to_string());
        }
    }
}
