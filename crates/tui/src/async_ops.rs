use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use tgdigest_core::{Chat, ChatBackend, ChatId, FetchError};
use tgdigest_summary::Summarizer;

/// Tag identifying one dispatched summary pipeline.
pub type Ticket = u64;

/// Deferred units of work that leave the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchChats,
    FetchAccount,
    Summarize { chat_id: ChatId, ticket: Ticket },
    SetLoading { ticket: Ticket, loading: bool },
    SpinnerTick { after: Duration },
    /// Steps run one after another in a single task; their events arrive in
    /// the same order.
    Sequence(Vec<Command>),
}

/// Results delivered back to the UI thread. The only way async work touches
/// the session model.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ChatsFetched(Vec<Chat>),
    /// `None` when the account name could not be fetched.
    AccountFetched(Option<String>),
    SummaryFetched { ticket: Ticket, text: String },
    LoadingChanged { ticket: Ticket, loading: bool },
    Failed {
        ticket: Option<Ticket>,
        error: FetchError,
    },
    SpinnerTicked,
}

/// `loading on -> summarize -> loading off`, as one ordered command.
pub fn summary_pipeline(chat_id: ChatId, ticket: Ticket) -> Command {
    Command::Sequence(vec![
        Command::SetLoading {
            ticket,
            loading: true,
        },
        Command::Summarize { chat_id, ticket },
        Command::SetLoading {
            ticket,
            loading: false,
        },
    ])
}

impl Command {
    /// Flatten nested sequences into the ordered list of leaf steps.
    pub fn into_steps(self) -> Vec<Command> {
        match self {
            Command::Sequence(commands) => commands
                .into_iter()
                .flat_map(Command::into_steps)
                .collect(),
            step => vec![step],
        }
    }
}

/// Handles the async work needs.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn ChatBackend>,
    pub summarizer: Summarizer,
}

/// Runs one leaf step to completion and returns its event.
pub async fn execute(step: Command, services: &Services) -> Option<Event> {
    match step {
        Command::FetchChats => Some(match services.backend.list_chats().await {
            Ok(chats) => Event::ChatsFetched(chats),
            Err(e) => Event::Failed {
                ticket: None,
                error: FetchError::list(e),
            },
        }),

        Command::FetchAccount => {
            let name = match services.backend.me().await {
                Ok(name) if !name.trim().is_empty() => Some(name),
                Ok(_) => None,
                Err(e) => {
                    warn!("could not fetch account name: {e}");
                    None
                }
            };
            Some(Event::AccountFetched(name))
        }

        Command::Summarize { chat_id, ticket } => {
            Some(match services.summarizer.summarize(chat_id).await {
                Ok(text) => Event::SummaryFetched { ticket, text },
                Err(error) => {
                    warn!(chat_id, ticket, "summary pipeline failed: {error}");
                    Event::Failed {
                        ticket: Some(ticket),
                        error,
                    }
                }
            })
        }

        Command::SetLoading { ticket, loading } => Some(Event::LoadingChanged { ticket, loading }),

        Command::SpinnerTick { after } => {
            tokio::time::sleep(after).await;
            Some(Event::SpinnerTicked)
        }

        Command::Sequence(_) => None,
    }
}

/// Run a command's steps in order, forwarding each event as soon as it exists.
pub async fn run_command(cmd: Command, services: &Services, tx: &mpsc::Sender<Event>) {
    for step in cmd.into_steps() {
        let Some(event) = execute(step, services).await else {
            continue;
        };
        if tx.send(event).is_err() {
            debug!("event receiver dropped, abandoning command");
            return;
        }
    }
}

/// Spawns commands onto the runtime; events come back over a std channel
/// drained by the UI loop.
pub struct CommandBus {
    runtime: Handle,
    services: Services,
    tx: mpsc::Sender<Event>,
}

impl CommandBus {
    pub fn new(runtime: Handle, services: Services) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                runtime,
                services,
                tx,
            },
            rx,
        )
    }

    /// Fire and forget. In-flight commands are never cancelled.
    pub fn dispatch(&self, cmd: Command) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            run_command(cmd, &services, &tx).await;
        });
    }

    pub fn dispatch_all(&self, commands: impl IntoIterator<Item = Command>) {
        for cmd in commands {
            self.dispatch(cmd);
        }
    }
}
