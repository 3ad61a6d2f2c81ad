//! Ticket store port
//!
//! Defines the interface to the shared ticket board. The board owns all
//! ticket state; this core only reads snapshots and requests mutations.
//! Comment ordering is the board's, and it is the only serialization point
//! between concurrently running personas.

use async_trait::async_trait;
use crewboard_domain::{ListId, Member, MemberId, Ticket, TicketId};
use thiserror::Error;

/// Errors that can occur during ticket store operations
#[derive(Error, Debug)]
pub enum TicketStoreError {
    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Board request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected board response: {0}")]
    InvalidResponse(String),
}

/// Access to the shared ticket board
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All tickets on the board, in board order.
    async fn board_tickets(&self) -> Result<Vec<Ticket>, TicketStoreError>;

    /// Resolve a column by its display name.
    async fn list_id_by_name(&self, name: &str) -> Result<ListId, TicketStoreError>;

    /// Create a ticket in the given column.
    async fn create_ticket(
        &self,
        title: &str,
        description: &str,
        list: &ListId,
    ) -> Result<Ticket, TicketStoreError>;

    /// Move a ticket to another column.
    async fn move_ticket(&self, ticket: &TicketId, list: &ListId) -> Result<(), TicketStoreError>;

    /// Add a member to a ticket's assignees.
    async fn assign_member(
        &self,
        ticket: &TicketId,
        member: &MemberId,
    ) -> Result<(), TicketStoreError>;

    /// Append a comment to a ticket.
    async fn post_comment(&self, ticket: &TicketId, text: &str) -> Result<(), TicketStoreError>;

    /// All comments on a ticket, in board order.
    async fn comments(&self, ticket: &TicketId) -> Result<Vec<String>, TicketStoreError>;

    /// Resolve a member by id.
    async fn member(&self, id: &MemberId) -> Result<Member, TicketStoreError>;

    /// Resolve a member by display name.
    async fn member_by_name(&self, name: &str) -> Result<Member, TicketStoreError>;

    /// All members of the board.
    async fn board_members(&self) -> Result<Vec<Member>, TicketStoreError>;
}
