//! Answering a clarification request.
//!
//! The mirror image of posting questions: a persona receives another
//! persona's question from a ticket's comment stream and must produce a
//! definitive answer - never a further question - tagged back to the
//! requester.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use crewboard_domain::{PromptTemplate, RecipientTag, TicketId};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while answering a clarification
#[derive(Error, Debug)]
pub enum AnswerClarificationError {
    #[error("Failed to generate clarification answer: {0}")]
    Generation(#[source] GatewayError),

    #[error("Failed to post clarification answer: {0}")]
    Post(#[source] TicketStoreError),
}

/// Use case producing a definitive answer to a tagged question.
pub struct AnswerClarification<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
}

impl<S: TicketStore, G: LlmGateway> AnswerClarification<S, G> {
    pub fn new(store: Arc<S>, gateway: Arc<G>) -> Self {
        Self { store, gateway }
    }

    /// Generate an answer for `request` and post it on the ticket, tagged
    /// to the original requester. Returns the generated answer text.
    pub async fn execute(
        &self,
        ticket: &TicketId,
        request: &str,
        requester: &RecipientTag,
    ) -> Result<String, AnswerClarificationError> {
        let answer = self
            .gateway
            .chat(&PromptTemplate::clarification_answer(request))
            .await
            .map_err(AnswerClarificationError::Generation)?;

        let comment = requester.address(&format!("Response: {}", answer));
        self.store
            .post_comment(ticket, &comment)
            .await
            .map_err(AnswerClarificationError::Post)?;

        info!(ticket = %ticket, requester = %requester, "posted clarification answer");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{RecordingStore, ScriptedGateway};

    #[tokio::test]
    async fn test_answer_is_posted_tagged_to_requester() {
        let store = Arc::new(RecordingStore::new());
        let gateway = Arc::new(ScriptedGateway::new(vec![
            "Use a sliding window per user.".to_string(),
        ]));

        let answer = AnswerClarification::new(store.clone(), gateway.clone())
            .execute(
                &TicketId::new("t1"),
                "Fixed window or sliding?",
                &RecipientTag::new("backenddev"),
            )
            .await
            .unwrap();

        assert_eq!(answer, "Use a sliding window per user.");
        let posted = store.posted_comments();
        assert_eq!(
            posted[0],
            "Response: Use a sliding window per user.\n@backenddev"
        );
        // The prompt demands an answer, not a counter-question.
        assert!(gateway.prompts()[0].contains("never ask them"));
    }

    #[tokio::test]
    async fn test_generation_failure_is_surfaced() {
        let store = Arc::new(RecordingStore::new());
        let gateway = Arc::new(ScriptedGateway::failing());

        let err = AnswerClarification::new(store.clone(), gateway)
            .execute(&TicketId::new("t1"), "q", &RecipientTag::new("dev"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnswerClarificationError::Generation(_)));
        assert!(store.posted_comments().is_empty());
    }
}
