use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ChatId = i64;
pub type MessageId = i64;
pub type UserId = i64;

/// Kind of conversation as reported by the chat backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Private,
    #[serde(alias = "basic_group")]
    Group,
    #[serde(alias = "supergroup")]
    SuperGroup,
    Secret,
}

impl ChatKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Private => "Private",
            Self::Group => "Group",
            Self::SuperGroup => "SuperGroup",
            Self::Secret => "Secret",
        }
    }

    /// Secret chats never show up in listings.
    pub fn is_listable(self) -> bool {
        !matches!(self, Self::Secret)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub kind: ChatKind,
}

impl Chat {
    pub fn new(id: ChatId, title: impl Into<String>, kind: ChatKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
        }
    }
}

/// Drop chats that must not be listed, keeping backend order.
pub fn listable_chats(chats: impl IntoIterator<Item = Chat>) -> Vec<Chat> {
    chats
        .into_iter()
        .filter(|chat| chat.kind.is_listable())
        .collect()
}

/// A text message ready for prompting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Author of a raw backend message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SenderRef {
    User { user_id: UserId },
    /// Posted on behalf of a chat or channel.
    Chat { chat_id: ChatId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
    },
    /// Photos, stickers, service messages and everything else we skip.
    #[serde(other)]
    Other,
}

/// One entry of a history batch, exactly as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: MessageId,
    pub sender: SenderRef,
    pub content: MessageContent,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
}

impl RawMessage {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text } => Some(text),
            MessageContent::Other => None,
        }
    }
}
