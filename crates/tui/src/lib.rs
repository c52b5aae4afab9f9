mod app;
mod async_ops;
mod config;
mod theme;
mod ui;
mod views;

pub use async_ops::Services;
pub use config::{default_config_path, default_log_path, load_config, save_config};

use anyhow::Result;
use app::App;
use async_ops::{CommandBus, Event};
use crossterm::{
    ExecutableCommand,
    event::{self, Event as TermEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;
use tgdigest_core::ChatBackend;
use tgdigest_runtime_config::UiSettings;
use tracing::{info, warn};

/// Launch the TUI and block until the user quits. The chat backend is closed
/// before returning, even when the terminal could not be restored.
pub fn run(ui: UiSettings, services: Services) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let backend = services.backend.clone();
    let (bus, events) = CommandBus::new(rt.handle().clone(), services);
    let mut app = App::new(ui);

    let result = run_terminal(&mut app, &bus, &events);
    shutdown(rt, backend.as_ref());
    result
}

fn run_terminal(app: &mut App, bus: &CommandBus, events: &mpsc::Receiver<Event>) -> Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let result = stdout()
        .execute(EnterAlternateScreen)
        .map_err(anyhow::Error::from)
        .and_then(|_| Terminal::new(CrosstermBackend::new(stdout())).map_err(anyhow::Error::from))
        .and_then(|mut terminal| event_loop(&mut terminal, app, bus, events));

    let restored = restore_terminal();
    result.and(restored)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Close the chat backend and stop the runtime. A failed close is only logged.
fn shutdown(rt: tokio::runtime::Runtime, backend: &dyn ChatBackend) {
    match rt.block_on(backend.close()) {
        Ok(()) => info!("chat backend closed"),
        Err(e) => warn!("error closing chat backend: {e}"),
    }
    rt.shutdown_timeout(Duration::from_secs(1));
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    bus: &CommandBus,
    events: &mpsc::Receiver<Event>,
) -> Result<()> {
    let poll_interval = Duration::from_millis(app.ui.tick_ms);

    loop {
        bus.dispatch_all(app.take_commands());

        // ── Drain async results ──────────────────────────────────────
        while let Ok(event) = events.try_recv() {
            app.apply_event(event);
        }
        bus.dispatch_all(app.take_commands());

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(poll_interval)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}
