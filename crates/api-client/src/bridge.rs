use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use tgdigest_core::{
    BackendError, Chat, ChatBackend, ChatId, MessageId, RawMessage, UserId, listable_chats,
};

/// Typed client for the local HTTP bridge that fronts the chat protocol.
///
/// The bridge owns the protocol session (authorization, local database); this
/// client only speaks JSON over HTTP with an optional bearer token.
pub struct BridgeClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatListResponse {
    chats: Vec<Chat>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    messages: Vec<RawMessage>,
}

/// User profile as served by `/users/{id}` and `/me`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserProfile {
    /// `"First Last"`, or just the first name when the last one is empty.
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if last.is_empty() {
            first.to_string()
        } else {
            format!("{first} {last}")
        }
    }
}

impl BridgeClient {
    /// Create a new client with the given base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn set_auth(&mut self, token: String) {
        self.auth_token = Some(token);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_token.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let resp = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(transport)?;
        parse_response(resp).await
    }

    // ── Users ─────────────────────────────────────────────────────────────

    async fn fetch_user(&self, user_id: UserId) -> Result<Option<UserProfile>, BackendError> {
        let resp = self
            .authorized(self.client.get(self.url(&format!("/users/{user_id}"))))
            .send()
            .await
            .map_err(transport)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_response(resp).await.map(Some)
    }
}

#[async_trait]
impl ChatBackend for BridgeClient {
    async fn list_chats(&self) -> Result<Vec<Chat>, BackendError> {
        let listing: ChatListResponse = self.get_json("/chats").await?;
        let chats = listable_chats(listing.chats);
        debug!(count = chats.len(), "listed chats");
        Ok(chats)
    }

    async fn history_batch(
        &self,
        chat_id: ChatId,
        from_message_id: MessageId,
        limit: u32,
    ) -> Result<Vec<RawMessage>, BackendError> {
        let path =
            format!("/chats/{chat_id}/history?from_message_id={from_message_id}&limit={limit}");
        let batch: HistoryResponse = self.get_json(&path).await?;
        debug!(
            chat_id,
            from_message_id,
            received = batch.messages.len(),
            "fetched history batch"
        );
        Ok(batch.messages)
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<Option<String>, BackendError> {
        let profile = self.fetch_user(user_id).await?;
        Ok(profile
            .map(|p| p.display_name())
            .filter(|name| !name.is_empty()))
    }

    async fn me(&self) -> Result<String, BackendError> {
        let profile: UserProfile = self.get_json("/me").await?;
        Ok(profile.display_name())
    }

    async fn close(&self) -> Result<(), BackendError> {
        let resp = self
            .authorized(self.client.post(self.url("/close")))
            .send()
            .await
            .map_err(transport)?;
        ensure_success(resp).await?;
        info!("chat bridge session closed");
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
    let resp = ensure_success(resp).await?;
    let text = resp.text().await.map_err(transport)?;
    serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
}
