//! OpenAI-compatible adapter for the [`LlmGateway`] port.
//!
//! The port's contract is that the backend carries cumulative context across
//! calls. Chat-completions endpoints are stateless, so this adapter keeps
//! the running transcript itself and replays it on every request. The
//! transcript lives behind an async mutex, which also serializes calls the
//! way the single-threaded agent flow expects.
//!
//! The repository-context message is special: a refresh replaces the whole
//! context, so the transcript remembers where the current context exchange
//! sits and drops it before recording the next one. Without that, every
//! refresh would permanently add a full repository dump to each subsequent
//! request.

use crate::openai::protocol::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use crewboard_application::{GatewayError, LlmGateway};
use crewboard_domain::ChatMessage;
use std::ops::Range;
use tokio::sync::Mutex;
use tracing::debug;

/// Connection settings for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatBackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Replayed conversation state, with the current repository-context
/// exchange tracked so a refresh can displace it.
#[derive(Default)]
struct Transcript {
    messages: Vec<ChatMessage>,
    context: Option<Range<usize>>,
}

impl Transcript {
    /// Stage `messages` for sending. Returns the length to roll back to if
    /// the request fails.
    fn stage(&mut self, messages: &[ChatMessage]) -> usize {
        let sent_at = self.messages.len();
        self.messages.extend_from_slice(messages);
        sent_at
    }

    /// Drop the prior context exchange and stage `prompt` as the new one.
    fn stage_context(&mut self, prompt: &str) -> usize {
        if let Some(range) = self.context.take() {
            self.messages.drain(range);
        }
        self.stage(&[ChatMessage::user(prompt)])
    }

    fn commit(&mut self, reply: &str) {
        self.messages.push(ChatMessage::assistant(reply));
    }

    fn commit_context(&mut self, sent_at: usize, reply: &str) {
        self.commit(reply);
        self.context = Some(sent_at..self.messages.len());
    }

    fn rollback(&mut self, sent_at: usize) {
        self.messages.truncate(sent_at);
    }
}

/// Reqwest-based gateway to an OpenAI-compatible chat endpoint.
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: ChatBackendConfig,
    transcript: Mutex<Transcript>,
}

impl OpenAiGateway {
    pub fn new(config: ChatBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            transcript: Mutex::new(Transcript::default()),
        }
    }

    /// Number of messages currently carried in the transcript.
    pub async fn transcript_len(&self) -> usize {
        self.transcript.lock().await.messages.len()
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };

        debug!(messages = messages.len(), model = %self.config.model, "sending chat completion");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::ConnectionError(e.to_string())
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response body: {}", e)))?;

        parsed.first_text().ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn chat(&self, prompt: &str) -> Result<String, GatewayError> {
        self.chat_with_messages(&[ChatMessage::user(prompt)]).await
    }

    async fn chat_with_messages(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let mut transcript = self.transcript.lock().await;
        let sent_at = transcript.stage(messages);
        match self.complete(&transcript.messages).await {
            Ok(reply) => {
                transcript.commit(&reply);
                Ok(reply)
            }
            Err(e) => {
                // A failed exchange must not poison the replayed context.
                transcript.rollback(sent_at);
                Err(e)
            }
        }
    }

    async fn replace_context(&self, prompt: &str) -> Result<String, GatewayError> {
        let mut transcript = self.transcript.lock().await;
        let sent_at = transcript.stage_context(prompt);
        match self.complete(&transcript.messages).await {
            Ok(reply) => {
                transcript.commit_context(sent_at, &reply);
                Ok(reply)
            }
            Err(e) => {
                transcript.rollback(sent_at);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(transcript: &Transcript) -> Vec<&str> {
        transcript
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect()
    }

    #[test]
    fn test_config_carries_endpoint_settings() {
        let gateway = OpenAiGateway::new(ChatBackendConfig {
            base_url: "https://api.openai.com/v1/".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o".to_string(),
        });
        assert_eq!(gateway.config.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_transcript_starts_empty() {
        let gateway = OpenAiGateway::new(ChatBackendConfig {
            base_url: "http://localhost:1".to_string(),
            api_key: "k".to_string(),
            model: "m".to_string(),
        });
        assert_eq!(gateway.transcript_len().await, 0);
    }

    #[test]
    fn test_context_refresh_displaces_prior_snapshot() {
        let mut transcript = Transcript::default();

        let sent = transcript.stage_context("snapshot one");
        transcript.commit_context(sent, "ok");
        let sent = transcript.stage(&[ChatMessage::user("question")]);
        transcript.commit("answer");
        assert_eq!(transcript.messages.len(), 4);

        let sent = transcript.stage_context("snapshot two");
        transcript.commit_context(sent, "ok");

        let texts = contents(&transcript);
        assert!(!texts.contains(&"snapshot one"));
        assert_eq!(texts, vec!["question", "answer", "snapshot two", "ok"]);
    }

    #[test]
    fn test_repeated_refreshes_keep_transcript_bounded() {
        let mut transcript = Transcript::default();
        for i in 0..10 {
            let sent = transcript.stage_context(&format!("snapshot {}", i));
            transcript.commit_context(sent, "ok");
        }
        // One user message plus one assistant reply, regardless of refreshes.
        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[0].content, "snapshot 9");
    }

    #[test]
    fn test_failed_refresh_rolls_back_without_restoring_old_context() {
        let mut transcript = Transcript::default();
        let sent = transcript.stage_context("snapshot one");
        transcript.commit_context(sent, "ok");

        let sent = transcript.stage_context("snapshot two");
        transcript.rollback(sent);

        // Old context is gone and no half-sent message remains; the caller
        // re-triggers the refresh before relying on file content again.
        assert!(transcript.messages.is_empty());
        assert!(transcript.context.is_none());
    }

    #[test]
    fn test_chat_rollback_preserves_installed_context() {
        let mut transcript = Transcript::default();
        let sent = transcript.stage_context("snapshot");
        transcript.commit_context(sent, "ok");

        let sent = transcript.stage(&[ChatMessage::user("question")]);
        transcript.rollback(sent);

        assert_eq!(contents(&transcript), vec!["snapshot", "ok"]);
    }
}
