use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::SummaryState;
use crate::theme::Theme;

/// Greedy word wrap to `width` display columns.
///
/// Existing line breaks are kept, runs of spaces collapse, and a single word
/// wider than `width` gets its own line rather than being split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if line_width > 0 && line_width + 1 + word_width > width {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        out.push(line);
    }
    out
}

pub fn render(frame: &mut Frame, state: &SummaryState, wrap_width: usize, area: Rect) {
    let block = Theme::block_accent()
        .title(" Summary ")
        .padding(Theme::PADDING_COMPACT);
    let content_style = Style::new().fg(Theme::TEXT_CONTENT);
    let lines: Vec<Line> = wrap_words(&state.text, wrap_width)
        .into_iter()
        .map(|line| Line::styled(line, content_style))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = *buffer.area();
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_words("the quick brown fox jumps over the lazy dog", 15);
        assert_eq!(lines, vec!["the quick brown", "fox jumps over", "the lazy dog"]);
        assert!(lines.iter().all(|line| line.width() <= 15));
    }

    #[test]
    fn keeps_paragraph_breaks_and_long_words() {
        let lines = wrap_words("first\n\nsupercalifragilistic word", 10);
        assert_eq!(lines, vec!["first", "", "supercalifragilistic", "word"]);
    }

    #[test]
    fn default_state_renders_placeholder() {
        let backend = TestBackend::new(90, 6);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, &SummaryState::default(), 80, area);
            })
            .expect("draw");
        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("Summary"));
        assert!(text.contains("No summary available."));
    }
}
