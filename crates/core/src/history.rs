//! Paginated history assembly.
//!
//! The backend serves history newest-first in bounded batches keyed by a
//! "before this message id" cursor. [`read_history`] walks those batches until
//! enough raw messages were seen or history ran out, keeps only text messages,
//! and hands them back oldest-first.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::backend::ChatBackend;
use crate::chat::{ChatId, Message, MessageId, RawMessage, SenderRef, UserId};
use crate::error::BackendError;

/// Upper bound the backend accepts for a single history request.
pub const HISTORY_BATCH_LIMIT: u32 = 100;

/// Sender label when a user cannot be resolved.
pub const UNKNOWN_SENDER: &str = "unknown";

/// Sender label for messages posted on behalf of a chat.
pub const CHAT_SENDER: &str = "SystemChat";

/// Read up to `total_wanted` of the most recent messages of a chat.
///
/// `total_wanted` counts raw messages, so non-text entries use up budget but
/// are not returned. The first failing batch aborts the whole read.
pub async fn read_history(
    backend: &dyn ChatBackend,
    chat_id: ChatId,
    total_wanted: i64,
) -> Result<Vec<Message>, BackendError> {
    let mut messages = Vec::new();
    let mut remaining = total_wanted;
    let mut from_message_id: MessageId = 0;
    let mut senders = SenderNames::default();

    while remaining > 0 {
        let limit = remaining.min(i64::from(HISTORY_BATCH_LIMIT)) as u32;
        let batch = backend
            .history_batch(chat_id, from_message_id, limit)
            .await?;

        let Some(oldest) = batch.last() else {
            debug!(chat_id, "reached the beginning of chat history");
            break;
        };
        from_message_id = oldest.id;
        remaining -= batch.len() as i64;

        for raw in batch {
            if let Some(message) = senders.message_from(backend, raw).await {
                messages.push(message);
            }
        }
    }

    messages.reverse();
    debug!(chat_id, count = messages.len(), "assembled chat history");
    Ok(messages)
}

/// Per-read cache of resolved user names.
#[derive(Default)]
struct SenderNames {
    users: HashMap<UserId, String>,
}

impl SenderNames {
    async fn message_from(&mut self, backend: &dyn ChatBackend, raw: RawMessage) -> Option<Message> {
        let text = raw.text()?.to_string();
        let sender = self.resolve(backend, raw.sender).await;
        Some(Message {
            sender,
            text,
            timestamp: raw.date,
        })
    }

    async fn resolve(&mut self, backend: &dyn ChatBackend, sender: SenderRef) -> String {
        let user_id = match sender {
            SenderRef::Chat { .. } => return CHAT_SENDER.to_string(),
            SenderRef::User { user_id: 0 } => return UNKNOWN_SENDER.to_string(),
            SenderRef::User { user_id } => user_id,
        };
        if let Some(name) = self.users.get(&user_id) {
            return name.clone();
        }

        let name = match backend.resolve_user(user_id).await {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => UNKNOWN_SENDER.to_string(),
            Err(e) => {
                warn!(user_id, "sender lookup failed, using placeholder: {e}");
                UNKNOWN_SENDER.to_string()
            }
        };
        self.users.insert(user_id, name.clone());
        name
    }
}
