use std::sync::Arc;

use tracing::{debug, info};

use tgdigest_core::{
    ChatBackend, ChatId, FetchError, GenerationRequest, TextGenerator, read_history,
};
use tgdigest_runtime_config::AppConfig;

/// History-to-summary unit of work: read history, build the prompt, generate.
///
/// Each step fails independently; the first failure aborts the rest and is
/// returned as a [`FetchError`]. Loading state is the caller's concern.
#[derive(Clone)]
pub struct Summarizer {
    backend: Arc<dyn ChatBackend>,
    generator: Arc<dyn TextGenerator>,
    model: String,
    temperature: f64,
    history_limit: i64,
}

impl Summarizer {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        generator: Arc<dyn TextGenerator>,
        model: impl Into<String>,
        temperature: f64,
        history_limit: i64,
    ) -> Self {
        Self {
            backend,
            generator,
            model: model.into(),
            temperature,
            history_limit,
        }
    }

    pub fn from_config(
        backend: Arc<dyn ChatBackend>,
        generator: Arc<dyn TextGenerator>,
        config: &AppConfig,
    ) -> Self {
        Self::new(
            backend,
            generator,
            config.ollama.model.clone(),
            config.ollama.temperature,
            config.summary.history_limit,
        )
    }

    pub async fn summarize(&self, chat_id: ChatId) -> Result<String, FetchError> {
        let messages = read_history(self.backend.as_ref(), chat_id, self.history_limit)
            .await
            .map_err(FetchError::history)?;
        debug!(chat_id, messages = messages.len(), "building summary prompt");

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: crate::prompt::build_prompt(&messages),
            temperature: self.temperature,
        };
        let raw = self.generator.generate(&request).await?;

        let summary = strip_reasoning(&raw);
        info!(chat_id, chars = summary.len(), "summary generated");
        Ok(summary)
    }
}

/// Drop a leading `<think>…</think>` block that reasoning models emit before
/// their answer. Text without a closed block is returned trimmed.
pub fn strip_reasoning(raw: &str) -> String {
    let trimmed = raw.trim_start();
    if let Some(rest) = trimmed.strip_prefix("<think>") {
        if let Some(end) = rest.find("</think>") {
            return rest[end + "</think>".len()..].trim().to_string();
        }
    }
    raw.trim().to_string()
}
