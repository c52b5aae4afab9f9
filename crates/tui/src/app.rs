use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use tracing::{debug, info};

use tgdigest_core::{Chat, FetchError};
use tgdigest_runtime_config::UiSettings;

use crate::async_ops::{Command, Event, Ticket, summary_pipeline};

pub const NO_SUMMARY: &str = "No summary available.";

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Sub-view that owns the body when neither an error nor loading does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Summary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatListState {
    pub chats: Vec<Chat>,
    /// Always `< chats.len()` when `chats` is non-empty.
    pub cursor: usize,
}

impl ChatListState {
    pub fn replace(&mut self, chats: Vec<Chat>) {
        self.chats = chats;
        self.cursor = self.cursor.min(self.chats.len().saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.chats.len() {
            self.cursor += 1;
        }
    }

    pub fn selected(&self) -> Option<&Chat> {
        self.chats.get(self.cursor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryState {
    pub text: String,
}

impl Default for SummaryState {
    fn default() -> Self {
        Self {
            text: NO_SUMMARY.to_string(),
        }
    }
}

/// Root session model. Mutated only on the UI thread, through key handling
/// and [`App::apply_event`].
pub struct App {
    pub error: Option<FetchError>,
    pub loading: bool,
    pub view: Option<View>,
    pub chat_list: ChatListState,
    pub summary: SummaryState,
    pub account: Option<String>,
    pub spinner_frame: usize,
    pub ui: UiSettings,
    spinner_scheduled: bool,
    current_ticket: Ticket,
    pending_commands: Vec<Command>,
}

impl App {
    /// Starts on the chat list and queues the initial chat and account fetches.
    pub fn new(ui: UiSettings) -> Self {
        Self {
            error: None,
            loading: false,
            view: Some(View::List),
            chat_list: ChatListState::default(),
            summary: SummaryState::default(),
            account: None,
            spinner_frame: 0,
            ui,
            spinner_scheduled: false,
            current_ticket: 0,
            pending_commands: vec![Command::FetchChats, Command::FetchAccount],
        }
    }

    /// Commands queued since the last call, in dispatch order.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending_commands)
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    // ── Key handling ──────────────────────────────────────────────────

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => {
                self.back_to_list();
                return false;
            }
            _ => {}
        }

        match self.view {
            Some(View::List) => self.handle_list_key(code),
            Some(View::Summary) | None => {}
        }
        false
    }

    fn back_to_list(&mut self) {
        if let Some(error) = self.error.take() {
            info!("retrying chat listing after error: {error}");
            self.pending_commands.push(Command::FetchChats);
        }
        self.view = Some(View::List);
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.chat_list.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.chat_list.move_down(),
            KeyCode::Enter => {
                let Some(chat_id) = self.chat_list.selected().map(|chat| chat.id) else {
                    return;
                };
                self.current_ticket += 1;
                debug!(chat_id, ticket = self.current_ticket, "dispatching summary");
                self.pending_commands
                    .push(summary_pipeline(chat_id, self.current_ticket));
            }
            _ => {}
        }
    }

    // ── Event handling ────────────────────────────────────────────────

    fn is_stale(&self, ticket: Ticket) -> bool {
        ticket != self.current_ticket
    }

    pub fn apply_event(&mut self, event: Event) {
        match event {
            Event::ChatsFetched(chats) => {
                self.chat_list.replace(chats);
                self.view = Some(View::List);
            }
            Event::AccountFetched(name) => {
                self.account = name;
            }
            Event::SummaryFetched { ticket, text } => {
                if self.is_stale(ticket) {
                    debug!(ticket, "dropping summary from superseded pipeline");
                    return;
                }
                self.summary.text = text;
                self.view = Some(View::Summary);
            }
            Event::Failed { ticket, error } => {
                if ticket.is_some_and(|t| self.is_stale(t)) {
                    debug!(?ticket, "dropping failure from superseded pipeline: {error}");
                    return;
                }
                self.error = Some(error);
                self.view = None;
            }
            Event::LoadingChanged { ticket, loading } => {
                if self.is_stale(ticket) {
                    return;
                }
                self.loading = loading;
                if loading {
                    self.schedule_spinner();
                }
            }
            Event::SpinnerTicked => {
                self.spinner_scheduled = false;
                if self.loading {
                    self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
                    self.schedule_spinner();
                }
            }
        }
    }

    fn schedule_spinner(&mut self) {
        if self.spinner_scheduled {
            return;
        }
        self.spinner_scheduled = true;
        self.pending_commands
            .push(Command::SpinnerTick { after: self.tick() });
    }
}
