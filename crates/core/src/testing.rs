//! In-memory collaborators for tests across the workspace.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::backend::{ChatBackend, GenerationRequest, TextGenerator};
use crate::chat::{
    Chat, ChatId, ChatKind, MessageContent, MessageId, RawMessage, SenderRef, UserId,
};
use crate::error::{BackendError, GenerateError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Arguments of one `history_batch` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCall {
    pub chat_id: ChatId,
    pub from_message_id: MessageId,
    pub limit: u32,
}

/// Chat backend that replays queued responses.
///
/// History batches are served in push order; once the queue is drained every
/// further call returns an empty batch (beginning of history).
#[derive(Default)]
pub struct ScriptedBackend {
    chats: Mutex<Option<Result<Vec<Chat>, BackendError>>>,
    batches: Mutex<VecDeque<Result<Vec<RawMessage>, BackendError>>>,
    users: HashMap<UserId, String>,
    failing_users: HashSet<UserId>,
    account: Option<String>,
    history_calls: Mutex<Vec<HistoryCall>>,
    user_lookups: AtomicUsize,
    closed: AtomicBool,
    close_error: Option<BackendError>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chats(self, chats: Vec<Chat>) -> Self {
        *lock(&self.chats) = Some(Ok(chats));
        self
    }

    pub fn with_list_error(self, err: BackendError) -> Self {
        *lock(&self.chats) = Some(Err(err));
        self
    }

    pub fn with_batch(self, batch: Vec<RawMessage>) -> Self {
        lock(&self.batches).push_back(Ok(batch));
        self
    }

    pub fn with_batch_error(self, err: BackendError) -> Self {
        lock(&self.batches).push_back(Err(err));
        self
    }

    pub fn with_user(mut self, user_id: UserId, name: &str) -> Self {
        self.users.insert(user_id, name.to_string());
        self
    }

    pub fn with_failing_user(mut self, user_id: UserId) -> Self {
        self.failing_users.insert(user_id);
        self
    }

    pub fn with_close_error(mut self, err: BackendError) -> Self {
        self.close_error = Some(err);
        self
    }

    pub fn with_account(mut self, name: &str) -> Self {
        self.account = Some(name.to_string());
        self
    }

    pub fn history_calls(&self) -> Vec<HistoryCall> {
        lock(&self.history_calls).clone()
    }

    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn list_chats(&self) -> Result<Vec<Chat>, BackendError> {
        lock(&self.chats).clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn history_batch(
        &self,
        chat_id: ChatId,
        from_message_id: MessageId,
        limit: u32,
    ) -> Result<Vec<RawMessage>, BackendError> {
        lock(&self.history_calls).push(HistoryCall {
            chat_id,
            from_message_id,
            limit,
        });
        lock(&self.batches).pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<Option<String>, BackendError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing_users.contains(&user_id) {
            return Err(BackendError::Other(format!("user {user_id} lookup failed")));
        }
        Ok(self.users.get(&user_id).cloned())
    }

    async fn me(&self) -> Result<String, BackendError> {
        self.account
            .clone()
            .ok_or_else(|| BackendError::Other("not signed in".to_string()))
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.closed.store(true, Ordering::SeqCst);
        match &self.close_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Generator that replays queued replies and records every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerateError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        let generator = Self::default();
        lock(&generator.replies).push_back(Ok(text.to_string()));
        generator
    }

    pub fn failing(err: GenerateError) -> Self {
        let generator = Self::default();
        lock(&generator.replies).push_back(Err(err));
        generator
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        lock(&self.requests).push(request.clone());
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            Err(GenerateError::Transport(
                "no scripted reply left".to_string(),
            ))
        })
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

/// 2024-03-01 09:00:00 on the local clock, so rendered transcripts read the
/// same in every timezone.
pub fn base_time() -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Text message whose date grows with its id.
pub fn text_message(id: MessageId, user_id: UserId, text: &str) -> RawMessage {
    RawMessage {
        id,
        sender: SenderRef::User { user_id },
        content: MessageContent::Text {
            text: text.to_string(),
        },
        date: base_time() + chrono::Duration::seconds(id),
    }
}

/// Non-text message (photo, sticker, ...).
pub fn media_message(id: MessageId, user_id: UserId) -> RawMessage {
    RawMessage {
        id,
        sender: SenderRef::User { user_id },
        content: MessageContent::Other,
        date: base_time() + chrono::Duration::seconds(id),
    }
}

/// Text message posted on behalf of a chat.
pub fn chat_post(id: MessageId, chat_id: ChatId, text: &str) -> RawMessage {
    RawMessage {
        id,
        sender: SenderRef::Chat { chat_id },
        content: MessageContent::Text {
            text: text.to_string(),
        },
        date: base_time() + chrono::Duration::seconds(id),
    }
}

/// `len` text messages from `user_id`, newest first, ids `newest_id` down.
pub fn newest_first_batch(newest_id: MessageId, len: usize, user_id: UserId) -> Vec<RawMessage> {
    (0..len as MessageId)
        .map(|offset| {
            let id = newest_id - offset;
            text_message(id, user_id, &format!("message {id}"))
        })
        .collect()
}

/// Two-chat listing used by UI scenarios.
pub fn sample_chats() -> Vec<Chat> {
    vec![
        Chat::new(1, "Alice", ChatKind::Private),
        Chat::new(2, "Team", ChatKind::Group),
    ]
}
