use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_ORANGE: Color = Color::Rgb(217, 119, 80);
    pub const SPINNER: Color = Color::Rgb(220, 100, 160);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_COMPACT: Padding = Padding::new(1, 1, 0, 0);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }
}

// ── Chat kind color ──────────────────────────────────────────────────

pub fn kind_color(kind: tgdigest_core::ChatKind) -> Color {
    use tgdigest_core::ChatKind;
    match kind {
        ChatKind::Private => Color::Rgb(80, 200, 120),
        ChatKind::Group => Color::Rgb(220, 180, 60),
        ChatKind::SuperGroup => Color::Rgb(180, 140, 220),
        ChatKind::Secret => Theme::TEXT_MUTED,
    }
}
