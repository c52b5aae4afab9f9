pub mod bridge;
pub mod ollama;

#[cfg(test)]
mod mock_server;

pub use bridge::BridgeClient;
pub use ollama::OllamaClient;
