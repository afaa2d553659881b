//! Channel tab strip.
//!
//! One tab per open room, labeled with the tab text the sync engine keeps
//! current (live bullet + display name), falling back to the room name
//! until the first refresh lands.

use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let bg = Style::default().bg(Theme::BG_DARK);
    let online_bullet = state.prefs.get_str("bullet_online", "\u{25A0}");

    let rooms = state.rooms.snapshot();
    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0usize;
    let max_width = area.width as usize;

    for (i, key) in state.buffer_order().into_iter().enumerate() {
        let is_active = key == state.active_buffer;
        let unread = state
            .buffers
            .get(&key)
            .map(|b| b.unread_count)
            .unwrap_or(0);

        let label = match &key {
            BufferKey::Status => "crabwatch".to_string(),
            BufferKey::Room(name) => rooms
                .iter()
                .find(|r| r.name == *name)
                .and_then(|r| r.tab_label.clone())
                .unwrap_or_else(|| name.clone()),
        };

        let is_live = matches!(key, BufferKey::Room(_)) && label.starts_with(&online_bullet);

        let style = if is_active {
            Theme::tab_active()
        } else if unread > 0 {
            Theme::tab_unread()
        } else if is_live {
            Theme::tab_live()
        } else {
            Theme::tab_normal()
        };

        let text = if unread > 0 && !is_active {
            format!(" {} ({}) ", label, unread)
        } else {
            format!(" {} ", label)
        };

        let sep_width = if i > 0 { 1 } else { 0 };
        if used + sep_width + text.width() + 1 > max_width {
            spans.push(Span::styled("\u{2026}", Style::default().fg(Theme::TEXT_MUTED)));
            break;
        }
        if i > 0 {
            spans.push(Span::styled("\u{2502}", Style::default().fg(Theme::BORDER_DIM)));
            used += 1;
        }
        used += text.width();
        spans.push(Span::styled(text, style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(bg);
    frame.render_widget(paragraph, area);
}
