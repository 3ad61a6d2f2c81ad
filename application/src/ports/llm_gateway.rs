//! LLM Gateway port
//!
//! Defines the interface for communicating with the language-model backend.
//! The backend carries cumulative conversation context across calls; callers
//! that need a known context state re-prime it explicitly (see the context
//! synchronizer and its revision counter).

use async_trait::async_trait;
use crewboard_domain::ChatMessage;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a single user prompt and return the model's text response.
    async fn chat(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Send explicit multi-role messages (used for system-level context
    /// injection) and return the model's text response.
    async fn chat_with_messages(&self, messages: &[ChatMessage]) -> Result<String, GatewayError>;

    /// Send `prompt` as the repository-context message. Fully replaces any
    /// context previously installed through this method; backends that carry
    /// conversation state must displace the prior context rather than
    /// accumulate generations.
    async fn replace_context(&self, prompt: &str) -> Result<String, GatewayError>;
}
