use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::ChatListState;
use crate::theme::{self, Theme};

/// Index range `[start, end)` of at most `max_visible` rows, centred on the
/// cursor and pinned to the ends of the list.
pub fn visible_window(len: usize, cursor: usize, max_visible: usize) -> (usize, usize) {
    let mut start = cursor.saturating_sub(max_visible / 2);
    let mut end = start + max_visible;
    if end > len {
        end = len;
        start = end.saturating_sub(max_visible);
    }
    (start, end)
}

pub fn render(frame: &mut Frame, state: &ChatListState, max_visible: usize, area: Rect) {
    let block = Theme::block().title(" Chats ").padding(Theme::PADDING_COMPACT);

    if state.chats.is_empty() {
        let text = Paragraph::new(Line::styled(
            "Loading chats...",
            Style::new().fg(Theme::TEXT_SECONDARY).italic(),
        ))
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    let (start, end) = visible_window(state.chats.len(), state.cursor, max_visible);
    let more_style = Style::new().fg(Theme::TEXT_MUTED);

    let mut lines = Vec::with_capacity(end - start + 2);
    if start > 0 {
        lines.push(Line::styled("...", more_style));
    }
    for (idx, chat) in state.chats[start..end].iter().enumerate() {
        let selected = start + idx == state.cursor;
        let (marker, title_style) = if selected {
            (">", Style::new().fg(Theme::ACCENT_BLUE).bold())
        } else {
            (" ", Style::new().fg(Theme::TEXT_PRIMARY))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), title_style),
            Span::styled(chat.title.clone(), title_style),
            Span::styled(
                format!(" ({})", chat.kind.label()),
                Style::new().fg(theme::kind_color(chat.kind)),
            ),
        ]));
    }
    if end < state.chats.len() {
        lines.push(Line::styled("...", more_style));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
