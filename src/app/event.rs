use crossterm::event::Event as CrosstermEvent;

use crate::sync::RefreshOutcome;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// IRC message received from the chat server
    IrcMessage {
        message: irc::client::prelude::Message,
    },

    /// IRC connection state changed
    IrcConnected,
    IrcDisconnected {
        reason: String,
    },
    IrcError {
        error: String,
    },

    /// The recurring status-refresh timer fired
    RefreshTimer,

    /// A spawned refresh cycle finished
    RefreshFinished {
        outcome: RefreshOutcome,
        /// Triggered by /refresh (report to the user) rather than by the
        /// timer or a join (silent, logged only).
        manual: bool,
    },

    /// Tick for UI refresh
    Tick,
}
