//! Port for chat-style language model completions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A system instruction plus one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System instruction.
    pub system_prompt: String,
    /// User message.
    pub user_message: String,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Text returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Model that produced the text.
    pub model: String,
}

/// Language model completion contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Requests one completion.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when the endpoint fails, times out or
    /// answers with an unexpected shape.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}

/// Errors returned by completion clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// The endpoint answered with a non-success status.
    #[error("completion endpoint responded with HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The request did not complete in time.
    #[error("completion request timed out")]
    Timeout,

    /// Connection or TLS failure.
    #[error("completion transport error: {0}")]
    Transport(String),

    /// The response body did not contain a completion.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),

    /// The client is missing credentials or configuration.
    #[error("completion client not configured: {0}")]
    NotConfigured(String),
}
