use crate::app::action::Action;
use crate::app::commands::{self, ParsedCommand};
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::sync::registry;
use crate::sync::RefreshOutcome;
use chrono::Local;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::IrcMessage { message } => handle_irc_message(state, message),
        AppEvent::IrcConnected => {
            state.status = ConnectionStatus::Connected;
            let host = state.config.chat.host.clone();
            state.system_message(&BufferKey::Status, format!("Connected to {}.", host));
            // Channels from the config join asynchronously; each JOIN echo
            // triggers its own single-channel refresh. This initial full
            // pass covers anything already in the room table.
            vec![Action::RefreshAll { manual: false }]
        }
        AppEvent::IrcDisconnected { reason } => {
            state.status = ConnectionStatus::Disconnected;
            state.system_message(&BufferKey::Status, format!("Disconnected: {}", reason));
            vec![]
        }
        AppEvent::IrcError { error } => {
            state.error_message(&BufferKey::Status, error);
            vec![]
        }
        AppEvent::RefreshTimer => vec![Action::RefreshAll { manual: false }],
        AppEvent::RefreshFinished { outcome, manual } => {
            state.dirty = true;
            match outcome {
                RefreshOutcome::Completed(summary) => {
                    state.last_refresh =
                        Some((Local::now().format("%H:%M:%S").to_string(), summary));
                    if manual {
                        let key = state.active_buffer.clone();
                        state.system_message(
                            &key,
                            format!(
                                "Refreshed {} Twitch channels ({} updated, {} unknown)",
                                summary.channels, summary.updated, summary.unknown
                            ),
                        );
                    }
                }
                RefreshOutcome::Skipped => {
                    if manual {
                        let key = state.active_buffer.clone();
                        state.system_message(&key, "A refresh is already running".to_string());
                    }
                }
            }
            vec![]
        }
        AppEvent::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            // Redraw once a second for the status-bar clock.
            if state.tick_count % 20 == 0 {
                state.dirty = true;
            }
            vec![]
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit { message: None }];
    }

    // Buffer switching works from any focus.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Right | KeyCode::Char('n') => {
                state.next_buffer();
                return vec![];
            }
            KeyCode::Left | KeyCode::Char('p') => {
                state.prev_buffer();
                return vec![];
            }
            _ => {}
        }
    }

    if key.code == KeyCode::Tab {
        state.focus = match state.focus {
            FocusPanel::Input => FocusPanel::MessageArea,
            FocusPanel::MessageArea => FocusPanel::Input,
        };
        return vec![];
    }

    match state.focus {
        FocusPanel::Input => handle_input_key(state, key),
        FocusPanel::MessageArea => handle_scroll_key(state, key),
    }
}

fn handle_input_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Enter => {
            let text = std::mem::take(&mut state.input.text);
            state.input.cursor = 0;
            submit_line(state, text.trim())
        }
        KeyCode::Char(c) => {
            let idx = byte_index(&state.input.text, state.input.cursor);
            state.input.text.insert(idx, c);
            state.input.cursor += 1;
            vec![]
        }
        KeyCode::Backspace => {
            if state.input.cursor > 0 {
                state.input.cursor -= 1;
                let idx = byte_index(&state.input.text, state.input.cursor);
                state.input.text.remove(idx);
            }
            vec![]
        }
        KeyCode::Delete => {
            let idx = byte_index(&state.input.text, state.input.cursor);
            if idx < state.input.text.len() {
                state.input.text.remove(idx);
            }
            vec![]
        }
        KeyCode::Left => {
            state.input.cursor = state.input.cursor.saturating_sub(1);
            vec![]
        }
        KeyCode::Right => {
            let chars = state.input.text.chars().count();
            state.input.cursor = (state.input.cursor + 1).min(chars);
            vec![]
        }
        KeyCode::Home => {
            state.input.cursor = 0;
            vec![]
        }
        KeyCode::End => {
            state.input.cursor = state.input.text.chars().count();
            vec![]
        }
        KeyCode::Esc => {
            state.input.text.clear();
            state.input.cursor = 0;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_scroll_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let step = match key.code {
        KeyCode::Up => 1,
        KeyCode::Down => -1,
        KeyCode::PageUp => 10,
        KeyCode::PageDown => -10,
        KeyCode::End => {
            if let Some(buf) = state.buffers.get_mut(&state.active_buffer) {
                buf.scroll_offset = 0;
            }
            return vec![];
        }
        KeyCode::Esc => {
            state.focus = FocusPanel::Input;
            return vec![];
        }
        _ => return vec![],
    };
    if let Some(buf) = state.buffers.get_mut(&state.active_buffer) {
        let max = buf.messages.len().saturating_sub(1);
        buf.scroll_offset = buf
            .scroll_offset
            .saturating_add_signed(step)
            .min(max);
    }
    vec![]
}

fn submit_line(state: &mut AppState, text: &str) -> Vec<Action> {
    if text.is_empty() {
        return vec![];
    }
    if text.starts_with('/') {
        return handle_command(state, text);
    }

    // Plain text goes to the active room.
    let Some(room) = state.active_room().map(str::to_string) else {
        state.error_message(
            &BufferKey::Status,
            "Not in a channel. /join <channel> first.".to_string(),
        );
        return vec![];
    };
    let msg = Message {
        timestamp: Local::now().format(&state.timestamp_format).to_string(),
        sender: state.nickname.clone(),
        text: text.to_string(),
        kind: MessageKind::Normal,
    };
    state.add_message_to_buffer(&BufferKey::Room(room.clone()), msg);
    vec![Action::SendMessage {
        target: room,
        text: text.to_string(),
    }]
}

fn handle_command(state: &mut AppState, text: &str) -> Vec<Action> {
    let key = state.active_buffer.clone();
    match commands::parse_command(text) {
        Some(ParsedCommand::Set { key: name, value }) => {
            match value {
                Some(value) => match state.prefs.set(&name, &value) {
                    Ok(()) => state.system_message(&key, format!("{} = {}", name, value)),
                    Err(e) => state
                        .error_message(&key, format!("{}. Use /list to see variables", e)),
                },
                None => match state.prefs.get(&name) {
                    Some(value) => state.system_message(&key, format!("{} = {}", name, value)),
                    None => state.error_message(
                        &key,
                        format!("Unknown preference '{}'. Use /list to see variables", name),
                    ),
                },
            }
            vec![]
        }
        Some(ParsedCommand::Refresh) => {
            state.system_message(&key, "Refreshing all Twitch channels...".to_string());
            vec![Action::RefreshAll { manual: true }]
        }
        Some(ParsedCommand::List) => {
            for (name, value) in state.prefs.list() {
                state.system_message(&key, format!("{} = {}", name, value));
            }
            vec![]
        }
        Some(ParsedCommand::Join { channel }) => vec![Action::JoinChannel { channel }],
        Some(ParsedCommand::Part { channel }) => {
            let target = channel.or_else(|| state.active_room().map(str::to_string));
            match target {
                Some(channel) => vec![Action::PartChannel { channel }],
                None => {
                    state.error_message(&key, "Not in a channel".to_string());
                    vec![]
                }
            }
        }
        Some(ParsedCommand::Quit { message }) => vec![Action::Quit { message }],
        Some(ParsedCommand::Help) => {
            for line in commands::HELP_LINES {
                state.system_message(&key, line.to_string());
            }
            vec![]
        }
        None => {
            state.error_message(&key, "Unknown command. /help for commands".to_string());
            vec![]
        }
    }
}

pub fn handle_irc_message(
    state: &mut AppState,
    message: irc::client::prelude::Message,
) -> Vec<Action> {
    use irc::client::prelude::{Command, Prefix};

    let nick_from = match &message.prefix {
        Some(Prefix::Nickname(nick, _, _)) => nick.clone(),
        Some(Prefix::ServerName(name)) => name.clone(),
        None => String::new(),
    };

    match &message.command {
        Command::PRIVMSG(target, text) => {
            let (text, kind) = if text.starts_with('\x01') && text.ends_with('\x01') {
                let ctcp = &text[1..text.len() - 1];
                match ctcp.strip_prefix("ACTION ") {
                    Some(action_text) => (action_text.to_string(), MessageKind::Action),
                    // Other CTCP requests are not interesting on Twitch.
                    None => return vec![],
                }
            } else {
                (text.clone(), MessageKind::Normal)
            };

            let key = if target.starts_with('#') {
                BufferKey::Room(target.clone())
            } else {
                BufferKey::Status
            };
            let msg = Message {
                timestamp: Local::now().format(&state.timestamp_format).to_string(),
                sender: nick_from,
                text,
                kind,
            };
            state.add_message_to_buffer(&key, msg);
            vec![]
        }

        Command::JOIN(channel, _, _) => {
            let key = BufferKey::Room(channel.clone());
            let ours = nick_from.eq_ignore_ascii_case(&state.nickname);
            // Twitch occasionally replays our own JOIN; only the first
            // one opens the room and steals focus.
            let first_join = ours && !state.rooms.contains(channel);

            if first_join {
                let host = state.config.chat.host.clone();
                state.rooms.insert(channel, &host);
                state.set_active_buffer(key.clone());
            }

            let msg = Message {
                timestamp: Local::now().format(&state.timestamp_format).to_string(),
                sender: nick_from,
                text: format!("has joined {}", channel),
                kind: MessageKind::Join,
            };
            state.add_message_to_buffer(&key, msg);

            if first_join {
                // Correct the labels before any chat happens in the room.
                // The engine ignores the login if the server host is not a
                // tracked domain.
                return vec![Action::RefreshChannel {
                    login: registry::login_from_room(channel),
                }];
            }
            vec![]
        }

        Command::PART(channel, reason) => {
            let key = BufferKey::Room(channel.clone());
            if nick_from.eq_ignore_ascii_case(&state.nickname) {
                state.rooms.remove(channel);
                state.buffers.remove(&key);
                if state.active_buffer == key {
                    state.set_active_buffer(BufferKey::Status);
                }
                state.system_message(&BufferKey::Status, format!("Left {}", channel));
            } else {
                let reason_text = reason.as_deref().unwrap_or("");
                let msg = Message {
                    timestamp: Local::now().format(&state.timestamp_format).to_string(),
                    sender: nick_from,
                    text: format!("has left {} {}", channel, reason_text),
                    kind: MessageKind::Part,
                };
                state.add_message_to_buffer(&key, msg);
            }
            vec![]
        }

        Command::NOTICE(target, text) => {
            let key = if target.starts_with('#') {
                BufferKey::Room(target.clone())
            } else {
                BufferKey::Status
            };
            state.system_message(&key, text.clone());
            vec![]
        }

        _ => vec![],
    }
}

fn byte_index(text: &str, char_cursor: usize) -> usize {
    text.char_indices()
        .nth(char_cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rooms::RoomTable;
    use crate::config::AppConfig;
    use crate::prefs::{MemoryPrefStore, Preferences};
    use std::sync::Arc;

    fn state() -> AppState {
        let prefs = Preferences::new(Arc::new(MemoryPrefStore::default()));
        prefs.seed_defaults();
        AppState::new(
            AppConfig::default(),
            prefs,
            Arc::new(RoomTable::default()),
            "tester".into(),
        )
    }

    fn last_message(state: &AppState, key: &BufferKey) -> Message {
        state.buffers[key].messages.last().cloned().unwrap()
    }

    #[test]
    fn set_with_value_stores_and_echoes() {
        let mut s = state();
        let actions = handle_command(&mut s, "/set refresh_rate 60");
        assert!(actions.is_empty());
        assert_eq!(s.prefs.get_u64("refresh_rate", 600), 60);
        assert_eq!(last_message(&s, &BufferKey::Status).text, "refresh_rate = 60");
    }

    #[test]
    fn set_without_value_reads_back() {
        let mut s = state();
        handle_command(&mut s, "/set twitch_base_domain");
        assert_eq!(
            last_message(&s, &BufferKey::Status).text,
            "twitch_base_domain = twitch.tv"
        );
    }

    #[test]
    fn set_unknown_key_reports_error_without_state_change() {
        let mut s = state();
        handle_command(&mut s, "/set no_such_key on");
        let msg = last_message(&s, &BufferKey::Status);
        assert_eq!(msg.kind, MessageKind::Error);
        assert!(msg.text.contains("no_such_key"));
        assert!(s.prefs.get("no_such_key").is_none());
    }

    #[test]
    fn refresh_command_emits_action_and_confirmation() {
        let mut s = state();
        let actions = handle_command(&mut s, "/refresh");
        assert!(matches!(actions[0], Action::RefreshAll { manual: true }));
        assert!(last_message(&s, &BufferKey::Status)
            .text
            .starts_with("Refreshing"));
    }

    #[test]
    fn list_prints_one_line_per_preference() {
        let mut s = state();
        handle_command(&mut s, "/list");
        let lines = &s.buffers[&BufferKey::Status].messages;
        assert_eq!(lines.len(), crate::prefs::DEFAULTS.len());
        assert!(lines.iter().all(|m| m.text.contains(" = ")));
    }

    #[test]
    fn own_join_tracks_room_and_requests_refresh() {
        let mut s = state();
        let msg: irc::client::prelude::Message =
            ":tester!tester@tester.tmi.twitch.tv JOIN #alice\r\n".parse().unwrap();
        let actions = handle_irc_message(&mut s, msg);
        assert!(s.rooms.contains("#alice"));
        assert_eq!(s.active_buffer, BufferKey::Room("#alice".into()));
        assert!(matches!(
            &actions[0],
            Action::RefreshChannel { login } if login == "alice"
        ));
    }

    #[test]
    fn own_part_forgets_room() {
        let mut s = state();
        s.rooms.insert("#alice", "irc.chat.twitch.tv");
        s.set_active_buffer(BufferKey::Room("#alice".into()));
        let msg: irc::client::prelude::Message =
            ":tester!tester@tester.tmi.twitch.tv PART #alice\r\n".parse().unwrap();
        handle_irc_message(&mut s, msg);
        assert!(!s.rooms.contains("#alice"));
        assert_eq!(s.active_buffer, BufferKey::Status);
    }
}
