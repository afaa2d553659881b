//! Tracked-channel discovery.
//!
//! A room is tracked iff its server host contains the configured platform
//! base domain. Recomputed from the live room list every cycle; nothing
//! here is persisted.

use crate::sync::host::RoomHandle;

/// A tracked room paired with its canonical login name. Ephemeral: valid
/// only for the cycle that computed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedChannel {
    pub room: String,
    pub login: String,
}

/// Filter the open-room snapshot down to tracked channels, in the
/// snapshot's order. Empty input or no matches yields an empty vec.
pub fn tracked_channels(rooms: &[RoomHandle], base_domain: &str) -> Vec<TrackedChannel> {
    rooms
        .iter()
        .filter(|room| room.server_host.contains(base_domain))
        .map(|room| TrackedChannel {
            room: room.name.clone(),
            login: login_from_room(&room.name),
        })
        .collect()
}

/// Canonical login: channel prefix stripped, lowercased.
pub fn login_from_room(name: &str) -> String {
    name.trim_start_matches(['#', '&']).to_lowercase()
}
