//! Ticket orchestration.
//!
//! Drives one ticket through its lifecycle: clarification posted to the
//! reviewer, tagged reply awaited, reply decomposed into atomic task blocks,
//! one child ticket created per block in the destination column.
//!
//! Failure semantics follow the exchange protocol: failing to generate or
//! post the clarification, timing out on the reply, or failing to generate
//! the decomposition are each fatal for the ticket and surfaced to the
//! caller without retry. Per-child creation failures are tolerated - the
//! failing item is logged and skipped, and the successful subset is
//! returned.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use crate::use_cases::clarification::{AwaitReplyError, ClarificationChannel};
use crewboard_domain::{
    parse_task_blocks, AgentProfile, PromptTemplate, RecipientTag, Ticket,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that end a ticket's flow
#[derive(Error, Debug)]
pub enum HandleTicketError {
    #[error("Failed to generate clarification: {0}")]
    ClarificationGeneration(#[source] GatewayError),

    #[error("Failed to post clarification comment: {0}")]
    ClarificationPost(#[source] TicketStoreError),

    #[error("Failed to receive reply: {0}")]
    Reply(#[from] AwaitReplyError),

    #[error("Failed to generate decomposition: {0}")]
    DecompositionGeneration(#[source] GatewayError),

    #[error("Failed to resolve destination column: {0}")]
    DestinationList(#[source] TicketStoreError),
}

/// Result of a decomposition pass.
///
/// `failed_creations` being non-zero is a soft condition: the tickets that
/// did get created are real and returned in source order.
#[derive(Debug, Default)]
pub struct DecompositionOutcome {
    pub created: Vec<Ticket>,
    pub failed_creations: usize,
    pub dropped_segments: usize,
}

/// Use case driving the clarification → decomposition flow for one ticket.
pub struct TicketOrchestrator<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
    channel: ClarificationChannel<S>,
    profile: AgentProfile,
    reviewer: RecipientTag,
    destination_list: String,
    processed_list: Option<String>,
}

impl<S: TicketStore, G: LlmGateway> TicketOrchestrator<S, G> {
    pub fn new(
        store: Arc<S>,
        gateway: Arc<G>,
        channel: ClarificationChannel<S>,
        profile: AgentProfile,
        reviewer: RecipientTag,
        destination_list: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            channel,
            profile,
            reviewer,
            destination_list: destination_list.into(),
            processed_list: None,
        }
    }

    /// Column successfully decomposed tickets are moved to. Acts as the
    /// board-persisted re-entry guard: assignment scans skip it.
    pub fn with_processed_list(mut self, list_name: impl Into<String>) -> Self {
        self.processed_list = Some(list_name.into());
        self
    }

    /// Run the full lifecycle for one ticket.
    pub async fn handle_ticket(
        &self,
        ticket: &Ticket,
    ) -> Result<DecompositionOutcome, HandleTicketError> {
        // Opened -> ClarificationPosted
        let prompt = PromptTemplate::clarification_request(ticket);
        let questions = self
            .gateway
            .chat(&prompt)
            .await
            .map_err(HandleTicketError::ClarificationGeneration)?;
        self.channel
            .post_question(&ticket.id, &questions, &self.reviewer)
            .await
            .map_err(HandleTicketError::ClarificationPost)?;
        info!(ticket = %ticket.id, reviewer = %self.reviewer, "posted clarification questions");

        // AwaitingReply
        let reply = self
            .channel
            .await_reply(&ticket.id, &self.profile.tag())
            .await?;
        info!(ticket = %ticket.id, "received tagged reply");

        // Decomposing -> ChildrenCreated
        let outcome = self
            .decompose(&PromptTemplate::decomposition_request(&reply))
            .await?;
        self.mark_processed(ticket).await;
        Ok(outcome)
    }

    /// One-shot decomposition of the ticket's own description, used when no
    /// clarification round is needed.
    pub async fn direct_decompose(
        &self,
        ticket: &Ticket,
    ) -> Result<DecompositionOutcome, HandleTicketError> {
        let outcome = self
            .decompose(&PromptTemplate::direct_decomposition(ticket))
            .await?;
        self.mark_processed(ticket).await;
        Ok(outcome)
    }

    async fn decompose(&self, prompt: &str) -> Result<DecompositionOutcome, HandleTicketError> {
        let response = self
            .gateway
            .chat(prompt)
            .await
            .map_err(HandleTicketError::DecompositionGeneration)?;

        let parsed = parse_task_blocks(&response);
        if parsed.dropped_segments > 0 {
            warn!(
                dropped = parsed.dropped_segments,
                "decomposition response contained unusable segments"
            );
        }
        if parsed.is_empty() {
            debug!("decomposition yielded no task blocks");
            return Ok(DecompositionOutcome {
                dropped_segments: parsed.dropped_segments,
                ..Default::default()
            });
        }

        let destination = self
            .store
            .list_id_by_name(&self.destination_list)
            .await
            .map_err(HandleTicketError::DestinationList)?;

        let mut outcome = DecompositionOutcome {
            dropped_segments: parsed.dropped_segments,
            ..Default::default()
        };
        for block in &parsed.blocks {
            match self
                .store
                .create_ticket(&block.title, &block.description, &destination)
                .await
            {
                Ok(child) => {
                    debug!(child = %child.id, title = %block.title, "created child ticket");
                    outcome.created.push(child);
                }
                Err(e) => {
                    warn!(title = %block.title, error = %e, "failed to create child ticket, skipping");
                    outcome.failed_creations += 1;
                }
            }
        }

        info!(
            created = outcome.created.len(),
            failed = outcome.failed_creations,
            "decomposition finished"
        );
        Ok(outcome)
    }

    /// Move the parent to the processed column, when configured. Failure
    /// here leaves the ticket eligible for an explicit re-run, so it is
    /// logged rather than surfaced.
    async fn mark_processed(&self, ticket: &Ticket) {
        let Some(list_name) = &self.processed_list else {
            return;
        };
        let moved = match self.store.list_id_by_name(list_name).await {
            Ok(list) => self.store.move_ticket(&ticket.id, &list).await,
            Err(e) => Err(e),
        };
        if let Err(e) = moved {
            warn!(ticket = %ticket.id, list = %list_name, error = %e, "could not move ticket to processed column");
        }
    }
}
