use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == FocusPanel::MessageArea;
    let (border_style, border_type) = if focused {
        (Theme::border_focused(), Theme::border_type_focused())
    } else {
        (Theme::border(), Theme::border_type())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(buf) = state.buffers.get(&state.active_buffer) else {
        return;
    };

    if buf.messages.is_empty() {
        let empty = Paragraph::new("Nothing here yet. /join <channel> to watch a Twitch channel.")
            .style(Style::default().fg(Theme::TEXT_MUTED));
        frame.render_widget(empty, inner);
        return;
    }

    let available_height = inner.height as usize;
    let total = buf.messages.len();

    // Compute visible range with scroll offset
    let end = total.saturating_sub(buf.scroll_offset);
    let start = end.saturating_sub(available_height);

    let lines: Vec<Line> = buf
        .messages
        .iter()
        .skip(start)
        .take(end - start)
        .map(|msg| format_message(msg, &state.nickname))
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);

    if total > available_height {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(available_height)).position(start);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("\u{2503}")
            .track_symbol(Some("\u{2502}"))
            .thumb_style(Theme::scrollbar_thumb())
            .track_style(Theme::scrollbar_track());

        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn format_message<'a>(msg: &Message, our_nick: &str) -> Line<'a> {
    let ts = Span::styled(format!("[{}] ", msg.timestamp), Theme::timestamp());

    match msg.kind {
        MessageKind::Normal => {
            let nick_style = if our_nick.eq_ignore_ascii_case(&msg.sender) {
                Theme::nick_self()
            } else {
                Theme::nick_color(&msg.sender)
            };
            Line::from(vec![
                ts,
                Span::styled(format!("<{}> ", msg.sender), nick_style),
                Span::styled(msg.text.clone(), Theme::message_text()),
            ])
        }
        MessageKind::Action => Line::from(vec![
            ts,
            Span::styled(
                format!("* {} {}", msg.sender, msg.text),
                Theme::action_message(),
            ),
        ]),
        MessageKind::System => Line::from(vec![
            ts,
            Span::styled("\u{2022} ", Style::default().fg(Theme::ACCENT_AMBER)),
            Span::styled(msg.text.clone(), Theme::system_message()),
        ]),
        MessageKind::Error => Line::from(vec![
            ts,
            Span::styled("\u{2718} ", Style::default().fg(Theme::ACCENT_ROSE)),
            Span::styled(msg.text.clone(), Theme::error_message()),
        ]),
        MessageKind::Join => Line::from(vec![
            ts,
            Span::styled(
                format!("\u{2192} {} {}", msg.sender, msg.text),
                Theme::join_message(),
            ),
        ]),
        MessageKind::Part => Line::from(vec![
            ts,
            Span::styled(
                format!("\u{2190} {} {}", msg.sender, msg.text),
                Theme::part_message(),
            ),
        ]),
    }
}
