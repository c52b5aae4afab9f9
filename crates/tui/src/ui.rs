use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::{App, View};
use crate::theme::Theme;
use crate::views::{chat_list, summary};

pub const WELCOME: &str = "Welcome to the Telegram Chat Summary Tool!";

pub fn render(frame: &mut Frame, app: &App) {
    let help = help_lines(app);
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(help.len() as u16),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);
    render_body(frame, app, body_area);
    render_footer(frame, &help, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![
        Span::styled(" tgdigest ", Style::new().fg(Theme::ACCENT_ORANGE).bold()),
        Span::raw(" "),
    ];
    match app.account.as_deref() {
        Some(name) => {
            spans.push(Span::styled("signed in as ", Style::new().fg(Theme::TEXT_SECONDARY)));
            spans.push(Span::styled(name.to_string(), Style::new().fg(Theme::TEXT_PRIMARY)));
        }
        None => spans.push(Span::styled(
            "Telegram chat summaries",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Error beats loading, loading beats the active view.
fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = &app.error {
        let text = vec![
            Line::styled(
                format!("Error: {error}"),
                Style::new().fg(Theme::ACCENT_RED).bold(),
            ),
            Line::raw(""),
            Line::styled(
                "Press ESC to reload the chat list.",
                Style::new().fg(Theme::TEXT_SECONDARY),
            ),
        ];
        let widget = Paragraph::new(text)
            .block(Theme::block().padding(Theme::PADDING_COMPACT))
            .wrap(Wrap { trim: false });
        frame.render_widget(widget, area);
        return;
    }

    if app.loading {
        let line = Line::from(vec![
            Span::styled("Loading... ", Style::new().fg(Theme::TEXT_SECONDARY)),
            Span::styled(app.spinner(), Style::new().fg(Theme::SPINNER)),
        ]);
        let widget = Paragraph::new(line).block(Theme::block().padding(Theme::PADDING_COMPACT));
        frame.render_widget(widget, area);
        return;
    }

    match app.view {
        Some(View::List) => chat_list::render(frame, &app.chat_list, app.ui.visible_chats, area),
        Some(View::Summary) => summary::render(frame, &app.summary, app.ui.wrap_width, area),
        None => {
            let widget = Paragraph::new(Line::styled(WELCOME, Style::new().fg(Theme::TEXT_PRIMARY)))
                .block(Theme::block().padding(Theme::PADDING_COMPACT));
            frame.render_widget(widget, area);
        }
    }
}

/// Hints for the active view followed by the global ones.
pub fn help_lines(app: &App) -> Vec<String> {
    let mut hints: Vec<&str> = match app.view {
        Some(View::List) => vec![
            "Use ↑/↓ to navigate through the chat list.",
            "Press Enter to select a chat and view its summary.",
        ],
        Some(View::Summary) | None => Vec::new(),
    };
    hints.push("Press ESC to return to the chat list.");
    hints.push("Press 'q' to quit.");
    hints.into_iter().map(|hint| format!("  :: {hint}")).collect()
}

fn render_footer(frame: &mut Frame, help: &[String], area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);
    let lines: Vec<Line> = help
        .iter()
        .map(|hint| match hint.split_once(":: ") {
            Some((prefix, rest)) => Line::from(vec![
                Span::styled(format!("{prefix}:: "), key_style),
                Span::styled(rest.to_string(), desc_style),
            ]),
            None => Line::styled(hint.clone(), desc_style),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_ops::Event;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use tgdigest_core::testing::sample_chats;
    use tgdigest_core::{FetchError, GenerateError};
    use tgdigest_runtime_config::UiSettings;

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

    fn render_text(app: &App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|frame| render(frame, app)).expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    fn app() -> App {
        let mut app = App::new(UiSettings::default());
        app.take_commands();
        app
    }

    #[test]
    fn list_view_shows_chats_and_navigation_help() {
        let mut app = app();
        app.apply_event(Event::ChatsFetched(sample_chats()));
        app.apply_event(Event::AccountFetched(Some("Alice Smith".into())));

        let text = render_text(&app);

        assert!(text.contains("signed in as Alice Smith"));
        assert!(text.contains("> Alice (Private)"));
        assert!(text.contains("  :: Press Enter to select a chat"));
        assert!(text.contains("  :: Press 'q' to quit."));
    }

    #[test]
    fn error_replaces_view_and_loading() {
        let mut app = app();
        app.apply_event(Event::ChatsFetched(sample_chats()));
        app.loading = true;
        app.apply_event(Event::Failed {
            ticket: None,
            error: FetchError::Generation(GenerateError::Status {
                status: 500,
                body: "boom".into(),
            }),
        });

        let text = render_text(&app);

        assert!(text.contains("Error: summary generation failed"));
        assert!(text.contains("Press ESC to reload the chat list."));
        assert!(!text.contains("Loading..."));
        assert!(!text.contains("Alice (Private)"));
        assert!(!text.contains("Press Enter"));
    }

    #[test]
    fn loading_replaces_active_view() {
        let mut app = app();
        app.apply_event(Event::ChatsFetched(sample_chats()));
        app.loading = true;

        let text = render_text(&app);

        assert!(text.contains("Loading... ⠋"));
        assert!(!text.contains("Alice (Private)"));
    }

    #[test]
    fn summary_view_shows_text_with_global_help_only() {
        let mut app = app();
        app.apply_event(Event::SummaryFetched {
            ticket: 0,
            text: "Everyone agreed to meet on Friday.".into(),
        });

        let text = render_text(&app);

        assert!(text.contains("Everyone agreed to meet on Friday."));
        assert_eq!(
            help_lines(&app),
            vec![
                "  :: Press ESC to return to the chat list.".to_string(),
                "  :: Press 'q' to quit.".to_string(),
            ]
        );
    }

    #[test]
    fn no_active_view_shows_welcome() {
        let mut app = app();
        app.view = None;
        assert!(render_text(&app).contains(WELCOME));
    }
}
