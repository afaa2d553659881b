use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub tab_strip: Rect,
    pub topic_bar: Rect,
    pub message_area: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab strip
            Constraint::Length(1), // Topic bar
            Constraint::Min(5),    // Messages
            Constraint::Length(3), // Input box
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        tab_strip: chunks[0],
        topic_bar: chunks[1],
        message_area: chunks[2],
        input_box: chunks[3],
        status_bar: chunks[4],
    }
}
