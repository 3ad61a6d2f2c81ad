//! Ticket assignment.
//!
//! Resolves a board member by display name and adds them to a ticket's
//! assignees. An unknown name is a configuration error and fatal to the
//! operation.

use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use crewboard_domain::{Member, TicketId};
use std::sync::Arc;
use tracing::info;

/// Use case assigning a ticket to a named board member.
pub struct AssignTicket<S> {
    store: Arc<S>,
}

impl<S: TicketStore> AssignTicket<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Assign `ticket` to the member whose display name is `member_name`.
    /// Returns the resolved member.
    pub async fn execute(
        &self,
        ticket: &TicketId,
        member_name: &str,
    ) -> Result<Member, TicketStoreError> {
        let member = self.store.member_by_name(member_name).await?;
        self.store.assign_member(ticket, &member.id).await?;
        info!(ticket = %ticket, member = %member.name, "ticket assigned");
        Ok(member)
    }
}
