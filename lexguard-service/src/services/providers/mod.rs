//! Completion provider abstraction.
//!
//! Handlers only see [`CompletionProvider`], so the OpenAI backend can be
//! swapped for the mock in tests and local development.

pub mod mock;
pub mod openai;

use crate::prompts::PromptPair;
use async_trait::async_trait;
use thiserror::Error;

/// Temperature used for every completion request.
pub const TEMPERATURE: f32 = 0.7;

/// Error type for provider operations.
///
/// The HTTP layer does not distinguish between variants; they exist so the
/// description carried to the client says what went wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Error code: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one system + user exchange and return the reply text.
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
