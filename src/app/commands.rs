//! User slash-command parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values that the event handler can act on.

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Get (`value` absent) or set a sync preference.
    Set { key: String, value: Option<String> },
    Refresh,
    List,
    Join { channel: String },
    Part { channel: Option<String> },
    Quit { message: Option<String> },
    Help,
}

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/` or is not a
/// recognized command. Commands are case-insensitive; a `/set` value keeps
/// its internal spacing.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    if !input.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = input[1..].splitn(3, ' ').collect();
    let cmd = parts.first()?.to_lowercase();

    match cmd.as_str() {
        "set" => {
            let key = parts.get(1)?.trim().to_string();
            if key.is_empty() {
                return None;
            }
            let value = parts.get(2).map(|v| v.to_string());
            Some(ParsedCommand::Set { key, value })
        }
        "refresh" => Some(ParsedCommand::Refresh),
        "list" => Some(ParsedCommand::List),
        "join" | "j" => {
            let channel = parts.get(1)?.trim().to_lowercase();
            if channel.is_empty() {
                return None;
            }
            // Twitch channel names are lowercase and '#'-prefixed.
            let channel = if channel.starts_with('#') {
                channel
            } else {
                format!("#{}", channel)
            };
            Some(ParsedCommand::Join { channel })
        }
        "part" | "leave" => {
            let channel = parts
                .get(1)
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .map(|c| if c.starts_with('#') { c } else { format!("#{}", c) });
            Some(ParsedCommand::Part { channel })
        }
        "quit" | "exit" => {
            let message = if parts.len() > 1 {
                Some(input[1..].splitn(2, ' ').nth(1).unwrap_or("").to_string())
            } else {
                None
            };
            Some(ParsedCommand::Quit { message })
        }
        "help" | "h" => Some(ParsedCommand::Help),
        _ => None,
    }
}

/// Usage lines for `/help`.
pub const HELP_LINES: &[&str] = &[
    "/set <key> [value...]  get or set a sync preference",
    "/refresh               refresh the status of all Twitch channels",
    "/list                  list all sync preferences",
    "/join <channel>        join a channel",
    "/part [channel]        leave a channel",
    "/quit [message]        exit",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_without_value_is_a_get() {
        assert_eq!(
            parse_command("/set refresh_rate"),
            Some(ParsedCommand::Set {
                key: "refresh_rate".into(),
                value: None
            })
        );
    }

    #[test]
    fn set_value_keeps_internal_spacing() {
        assert_eq!(
            parse_command("/set offline_text  is offline "),
            Some(ParsedCommand::Set {
                key: "offline_text".into(),
                value: Some(" is offline".into())
            })
        );
    }

    #[test]
    fn join_normalizes_channel_names() {
        assert_eq!(
            parse_command("/join Alice"),
            Some(ParsedCommand::Join {
                channel: "#alice".into()
            })
        );
        assert_eq!(
            parse_command("/j #Bob"),
            Some(ParsedCommand::Join {
                channel: "#bob".into()
            })
        );
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_command("/REFRESH"), Some(ParsedCommand::Refresh));
        assert_eq!(parse_command("/List"), Some(ParsedCommand::List));
    }

    #[test]
    fn unknown_or_plain_text_is_none() {
        assert_eq!(parse_command("hello world"), None);
        assert_eq!(parse_command("/bogus"), None);
        assert_eq!(parse_command("/set"), None);
    }

    #[test]
    fn part_without_argument_targets_active_room() {
        assert_eq!(parse_command("/part"), Some(ParsedCommand::Part { channel: None }));
        assert_eq!(
            parse_command("/leave bob"),
            Some(ParsedCommand::Part {
                channel: Some("#bob".into())
            })
        );
    }
}
