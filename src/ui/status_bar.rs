use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    parts.push(Span::styled(
        format!(" [{}] ", state.nickname),
        Style::default()
            .fg(Theme::ACCENT_GREEN)
            .bg(Theme::BG_ELEVATED),
    ));

    let (conn_text, conn_color) = match state.status {
        ConnectionStatus::Connected => ("connected", Theme::ACCENT_GREEN),
        ConnectionStatus::Connecting => ("connecting\u{2026}", Theme::ACCENT_AMBER),
        ConnectionStatus::Disconnected => ("disconnected", Theme::ACCENT_ROSE),
    };
    parts.push(Span::styled(
        format!(" {} ", conn_text),
        Style::default().fg(conn_color).bg(Theme::BG_ELEVATED),
    ));

    if let Some((when, summary)) = &state.last_refresh {
        parts.push(Span::styled(
            format!(
                " \u{2502} sync {} ({} ch, {} updated{}) ",
                when,
                summary.channels,
                summary.updated,
                if summary.unknown > 0 {
                    format!(", {} unknown", summary.unknown)
                } else {
                    String::new()
                }
            ),
            Theme::status_bar(),
        ));
    }

    // Focus indicator, right-aligned
    let focus_name = match state.focus {
        FocusPanel::Input => "INPUT",
        FocusPanel::MessageArea => "MESSAGES",
    };
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + focus_name.len() + 3);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        format!(" [{}] ", focus_name),
        Style::default()
            .fg(Theme::ACCENT_TEAL)
            .bg(Theme::BG_ELEVATED),
    ));

    let paragraph = Paragraph::new(Line::from(parts)).style(Theme::status_bar());
    frame.render_widget(paragraph, area);
}
