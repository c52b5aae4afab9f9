use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tgdigest_core::{GenerateError, GenerationRequest, TextGenerator};

const GENERATE_PATH: &str = "/api/generate";

/// Client for an Ollama-compatible `/api/generate` endpoint.
///
/// Requests are always non-streaming: the server answers once generation is
/// complete and the whole text arrives in a single JSON body.
pub struct OllamaClient {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequestPayload<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponsePayload {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub context: Vec<i64>,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub load_duration: u64,
    #[serde(default)]
    pub prompt_eval_count: u64,
    #[serde(default)]
    pub prompt_eval_duration: u64,
    #[serde(default)]
    pub eval_count: u64,
    #[serde(default)]
    pub eval_duration: u64,
}

impl OllamaClient {
    /// Create a client for `host` (e.g. `http://localhost:11434`).
    pub fn new(host: &str, timeout: Duration) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerateError::Transport(e.to_string()))?;
        Self::with_client(client, host)
    }

    /// Create from an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, host: &str) -> Result<Self, GenerateError> {
        let base = Url::parse(host.trim())
            .map_err(|e| GenerateError::InvalidUrl(format!("{host}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GenerateError::InvalidUrl(host.to_string()));
        }
        let mut endpoint = base;
        endpoint.set_path(GENERATE_PATH);
        endpoint.set_query(None);
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Send one generation request and return the decoded payload.
    pub async fn generate_payload(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerateResponsePayload, GenerateError> {
        let payload = GenerateRequestPayload {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
            },
        };
        let body = serde_json::to_vec(&payload).map_err(|e| GenerateError::Encode(e.to_string()))?;

        debug!(
            model = %request.model,
            prompt_bytes = request.prompt.len(),
            "sending generation request"
        );
        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerateError::Transport(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let decoded: GenerateResponsePayload =
            serde_json::from_str(&text).map_err(|e| GenerateError::Decode(e.to_string()))?;
        debug!(
            done = decoded.done,
            eval_count = decoded.eval_count,
            "generation finished"
        );
        Ok(decoded)
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        self.generate_payload(request)
            .await
            .map(|payload| payload.response)
    }
}
