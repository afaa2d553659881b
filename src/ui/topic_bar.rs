use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let bg_style = Style::default().bg(Theme::BG_ELEVATED);

    let line = match &state.active_buffer {
        BufferKey::Room(name) => {
            let topic = state
                .rooms
                .snapshot()
                .into_iter()
                .find(|r| r.name == *name)
                .and_then(|r| r.topic);

            let mut spans = vec![
                Span::styled(
                    " # ",
                    Style::default()
                        .fg(Theme::ACCENT_TEAL)
                        .bg(Theme::BG_ELEVATED)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    name.trim_start_matches('#').to_string(),
                    Style::default()
                        .fg(Theme::ACCENT_TEAL)
                        .bg(Theme::BG_ELEVATED)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    " \u{2502} ",
                    Style::default()
                        .fg(Theme::BORDER_DIM)
                        .bg(Theme::BG_ELEVATED),
                ),
            ];
            match topic {
                Some(topic) => spans.push(Span::styled(
                    topic,
                    Style::default()
                        .fg(Theme::TEXT_PRIMARY)
                        .bg(Theme::BG_ELEVATED),
                )),
                None => spans.push(Span::styled(
                    "No topic set",
                    Style::default()
                        .fg(Theme::TEXT_MUTED)
                        .bg(Theme::BG_ELEVATED)
                        .add_modifier(Modifier::ITALIC),
                )),
            }
            Line::from(spans)
        }
        BufferKey::Status => Line::from(vec![
            Span::styled(
                " \u{25C6} ",
                Style::default()
                    .fg(Theme::ACCENT_PURPLE)
                    .bg(Theme::BG_ELEVATED)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "crabwatch",
                Style::default()
                    .fg(Theme::TEXT_PRIMARY)
                    .bg(Theme::BG_ELEVATED)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " \u{2502} ",
                Style::default()
                    .fg(Theme::BORDER_DIM)
                    .bg(Theme::BG_ELEVATED),
            ),
            Span::styled(
                "Twitch chat with live-status tabs \u{2022} /help for commands",
                Style::default()
                    .fg(Theme::TEXT_SECONDARY)
                    .bg(Theme::BG_ELEVATED)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
    };

    let paragraph = Paragraph::new(line).style(bg_style);
    frame.render_widget(paragraph, area);
}
