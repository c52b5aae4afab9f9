/// Failure reported by a chat backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Failure reported by the text-generation server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("failed to send request: {0}")]
    Transport(String),

    #[error("server returned non-success status {status}, body: {body}")]
    Status { status: u16, body: String },

    #[error("failed to marshal payload: {0}")]
    Encode(String),

    #[error("failed to unmarshal response: {0}")]
    Decode(String),
}

/// Everything that can surface as a `Failed` event in the UI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("failed to list chats: {0}")]
    List(BackendError),

    #[error("failed to read chat history: {0}")]
    History(BackendError),

    #[error("summary generation failed: {0}")]
    Generation(GenerateError),

    #[error("malformed payload: {0}")]
    Marshal(String),
}

impl FetchError {
    pub fn list(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => Self::Marshal(msg),
            other => Self::List(other),
        }
    }

    pub fn history(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => Self::Marshal(msg),
            other => Self::History(other),
        }
    }
}

impl From<GenerateError> for FetchError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Encode(msg) | GenerateError::Decode(msg) => Self::Marshal(msg),
            other => Self::Generation(other),
        }
    }
}
