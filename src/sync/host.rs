/// An open chat room as the host sees it: display name (with channel
/// prefix) plus the server host it lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomHandle {
    pub name: String,
    pub server_host: String,
}

/// The narrow slice of the host chat client the sync engine needs: room
/// enumeration, and read/write access to the two externally-displayed
/// labels. Implementations use interior mutability; the engine only ever
/// holds `&self`.
pub trait HostClient: Send + Sync {
    fn list_open_rooms(&self) -> Vec<RoomHandle>;
    fn displayed_topic(&self, room: &str) -> Option<String>;
    fn displayed_tab(&self, room: &str) -> Option<String>;
    fn set_topic(&self, room: &str, text: &str);
    fn set_tab_label(&self, room: &str, text: &str);
}
