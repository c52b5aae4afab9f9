pub mod backend;
pub mod chat;
pub mod error;
pub mod history;

pub use backend::{ChatBackend, GenerationRequest, TextGenerator};
pub use chat::*;
pub use error::{BackendError, FetchError, GenerateError};
pub use history::{read_history, HISTORY_BATCH_LIMIT};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
