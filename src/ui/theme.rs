use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const BG_DARK: Color = Color::Rgb(18, 18, 24);
    pub const BG_ELEVATED: Color = Color::Rgb(32, 32, 42);
    pub const TEXT_PRIMARY: Color = Color::Rgb(225, 225, 235);
    pub const TEXT_SECONDARY: Color = Color::Rgb(160, 160, 175);
    pub const TEXT_MUTED: Color = Color::Rgb(105, 105, 120);
    pub const BORDER_DIM: Color = Color::Rgb(60, 60, 75);
    pub const ACCENT_TEAL: Color = Color::Rgb(80, 200, 210);
    pub const ACCENT_PURPLE: Color = Color::Rgb(169, 112, 255);
    pub const ACCENT_AMBER: Color = Color::Rgb(230, 180, 80);
    pub const ACCENT_ROSE: Color = Color::Rgb(235, 110, 130);
    pub const ACCENT_GREEN: Color = Color::Rgb(120, 210, 130);

    const NICK_PALETTE: [Color; 6] = [
        Color::Rgb(100, 170, 230),
        Color::Rgb(175, 140, 220),
        Color::Rgb(220, 150, 180),
        Color::Rgb(230, 180, 80),
        Color::Rgb(90, 210, 130),
        Color::Rgb(80, 200, 210),
    ];

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn border_type() -> BorderType {
        BorderType::Rounded
    }

    pub fn border_type_focused() -> BorderType {
        BorderType::Thick
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn timestamp() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn nick_self() -> Style {
        Style::default()
            .fg(Self::ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    /// Stable per-nick color from a tiny hash over the palette.
    pub fn nick_color(nick: &str) -> Style {
        let hash: usize = nick.bytes().map(|b| b as usize).sum();
        Style::default().fg(Self::NICK_PALETTE[hash % Self::NICK_PALETTE.len()])
    }

    pub fn message_text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn system_message() -> Style {
        Style::default().fg(Self::ACCENT_AMBER)
    }

    pub fn error_message() -> Style {
        Style::default().fg(Self::ACCENT_ROSE)
    }

    pub fn action_message() -> Style {
        Style::default().fg(Self::ACCENT_PURPLE)
    }

    pub fn join_message() -> Style {
        Style::default().fg(Self::ACCENT_GREEN)
    }

    pub fn part_message() -> Style {
        Style::default().fg(Self::ACCENT_ROSE)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_ELEVATED)
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .bg(Self::BG_ELEVATED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_normal() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn tab_unread() -> Style {
        Style::default().fg(Self::ACCENT_AMBER)
    }

    pub fn tab_live() -> Style {
        Style::default().fg(Self::ACCENT_PURPLE)
    }

    pub fn scrollbar_thumb() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn scrollbar_track() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }
}
