//! Contracts for the two external collaborators: the chat-protocol backend
//! and the text-generation server.

use async_trait::async_trait;

use crate::chat::{Chat, ChatId, MessageId, RawMessage, UserId};
use crate::error::{BackendError, GenerateError};

/// Access to the user's chats.
///
/// Implementations own their transport and authentication; callers only see
/// typed values and [`BackendError`].
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// All chats visible to the account, secret chats excluded.
    async fn list_chats(&self) -> Result<Vec<Chat>, BackendError>;

    /// Up to `limit` messages strictly older than `from_message_id`,
    /// newest first. `from_message_id == 0` starts at the latest message.
    /// An empty batch means the beginning of history was reached.
    async fn history_batch(
        &self,
        chat_id: ChatId,
        from_message_id: MessageId,
        limit: u32,
    ) -> Result<Vec<RawMessage>, BackendError>;

    /// Display name for a user, `None` when the backend does not know it.
    async fn resolve_user(&self, user_id: UserId) -> Result<Option<String>, BackendError>;

    /// Display name of the signed-in account.
    async fn me(&self) -> Result<String, BackendError>;

    async fn close(&self) -> Result<(), BackendError>;
}

/// A single non-streaming completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f64,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run generation to completion and return the full text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}
