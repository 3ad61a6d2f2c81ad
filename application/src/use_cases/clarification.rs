//! Clarification channel.
//!
//! The question/answer round trip between personas is conducted entirely
//! through board comments: a question is posted with the recipient's tag
//! appended, and the reply is detected by polling the full comment list for
//! the first comment carrying the waiting persona's tag.
//!
//! The poll is a cooperative, single-consumer block: each attempt re-reads
//! the whole comment list (no cursor), a match on any attempt returns
//! immediately, and unsuccessful reads are separated by the poll interval.
//! A `CancellationToken` is honored at every iteration so a supervisor can
//! abort the wait without exhausting the attempt budget.

use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use crewboard_domain::{RecipientTag, TicketId};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Poll discipline for a reply wait.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Suspension between two comment reads.
    pub interval: Duration,
    /// Number of reads before the wait fails with `Timeout`.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_attempts: 100,
        }
    }
}

/// Errors that can occur while waiting for a tagged reply
#[derive(Debug, thiserror::Error)]
pub enum AwaitReplyError {
    #[error("Failed to read comments: {0}")]
    Store(#[from] TicketStoreError),

    #[error("No reply tagged {tag} after {attempts} attempts")]
    Timeout { tag: String, attempts: u32 },

    #[error("Reply wait cancelled")]
    Cancelled,
}

/// Tagged question/reply exchange over a ticket's comment stream.
pub struct ClarificationChannel<S> {
    store: Arc<S>,
    policy: PollPolicy,
    cancellation_token: Option<CancellationToken>,
}

impl<S: TicketStore> ClarificationChannel<S> {
    pub fn new(store: Arc<S>, policy: PollPolicy) -> Self {
        Self {
            store,
            policy,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Post a question addressed to `recipient` as a new comment.
    pub async fn post_question(
        &self,
        ticket: &TicketId,
        question: &str,
        recipient: &RecipientTag,
    ) -> Result<(), TicketStoreError> {
        self.store
            .post_comment(ticket, &recipient.address(question))
            .await
    }

    /// Block until a comment tagged for `recipient` appears on the ticket.
    ///
    /// Returns the first matching comment in board order. Ties within one
    /// read resolve to the earliest comment, not the most recent. Fails with
    /// [`AwaitReplyError::Timeout`] after `max_attempts` unsuccessful reads.
    pub async fn await_reply(
        &self,
        ticket: &TicketId,
        recipient: &RecipientTag,
    ) -> Result<String, AwaitReplyError> {
        for attempt in 1..=self.policy.max_attempts {
            let comments = self.store.comments(ticket).await?;
            if let Some(reply) = comments.iter().find(|c| recipient.matches(c)) {
                return Ok(reply.clone());
            }

            debug!(
                ticket = %ticket,
                tag = %recipient,
                attempt,
                max_attempts = self.policy.max_attempts,
                "no tagged reply yet"
            );

            if attempt < self.policy.max_attempts {
                self.sleep_or_cancel().await?;
            }
        }

        Err(AwaitReplyError::Timeout {
            tag: recipient.to_string(),
            attempts: self.policy.max_attempts,
        })
    }

    async fn sleep_or_cancel(&self) -> Result<(), AwaitReplyError> {
        match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => Err(AwaitReplyError::Cancelled),
                    _ = tokio::time::sleep(self.policy.interval) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep(self.policy.interval).await;
                Ok(())
            }
        }
    }
}
