//! Assignment scanning.
//!
//! A persona only acts on tickets assigned to it. Each scan walks every
//! board ticket and resolves every assignee to a display name, comparing
//! case-insensitively against the persona's name. The scan is O(tickets x
//! assignees) with no caching - ticket volume is small and board state can
//! change between calls.
//!
//! The first assigned ticket discovered in a scan pass triggers one
//! repository context refresh; the flag resets at the start of every scan.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::repository_mirror::RepositoryMirror;
use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use crate::use_cases::sync_context::{ContextSynchronizer, SyncContextError};
use crewboard_domain::{AgentProfile, Ticket};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during an assignment scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read board: {0}")]
    Store(#[from] TicketStoreError),

    #[error("Failed to refresh context: {0}")]
    Sync(#[from] SyncContextError),
}

/// Use case finding the tickets addressed to one persona.
pub struct AssignmentScanner<S, M, G> {
    store: Arc<S>,
    sync: Arc<ContextSynchronizer<S, M, G>>,
    profile: AgentProfile,
    /// Column name whose tickets are skipped (the processed marker).
    skip_list: Option<String>,
}

impl<S: TicketStore, M: RepositoryMirror, G: LlmGateway> AssignmentScanner<S, M, G> {
    pub fn new(
        store: Arc<S>,
        sync: Arc<ContextSynchronizer<S, M, G>>,
        profile: AgentProfile,
    ) -> Self {
        Self {
            store,
            sync,
            profile,
            skip_list: None,
        }
    }

    pub fn skipping_list(mut self, list_name: impl Into<String>) -> Self {
        self.skip_list = Some(list_name.into());
        self
    }

    /// All board tickets assigned to this persona, in board order.
    ///
    /// Refreshes the repository context once per scan, lazily, when the
    /// first assigned ticket is found.
    pub async fn assigned_tickets(&self) -> Result<Vec<Ticket>, ScanError> {
        let tickets = self.store.board_tickets().await?;
        let skip_list = match &self.skip_list {
            Some(name) => Some(self.store.list_id_by_name(name).await?),
            None => None,
        };

        let mut assigned = Vec::new();
        let mut refreshed = false;

        for ticket in tickets {
            if skip_list.as_ref() == Some(&ticket.list_id) {
                debug!(ticket = %ticket.id, "skipping already-processed ticket");
                continue;
            }
            if self.belongs_to_me(&ticket).await? {
                if !refreshed {
                    self.sync.refresh_repository_context().await?;
                    refreshed = true;
                }
                assigned.push(ticket);
            }
        }

        Ok(assigned)
    }

    async fn belongs_to_me(&self, ticket: &Ticket) -> Result<bool, ScanError> {
        for member_id in &ticket.member_ids {
            match self.store.member(member_id).await {
                Ok(member) if self.profile.name.matches(&member.name) => return Ok(true),
                Ok(_) => {}
                Err(e) => {
                    warn!(ticket = %ticket.id, member = %member_id, error = %e, "could not resolve assignee");
                }
            }
        }
        Ok(false)
    }
}
