//! Board entities.
//!
//! A [`Ticket`] is the unit of work tracked on the external board. The board
//! owns it; this layer only reads a snapshot and requests mutations through
//! the store port. Comments are fetched separately, in board order, as plain
//! text with embedded `@name` address tokens.

use crate::ticket::value_objects::{ListId, MemberId, TicketId};
use serde::{Deserialize, Serialize};

/// A snapshot of a board ticket (card).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    /// Column the ticket currently sits in.
    pub list_id: ListId,
    /// Members the ticket is assigned to, in board order.
    pub member_ids: Vec<MemberId>,
}

impl Ticket {
    pub fn new(
        id: impl Into<TicketId>,
        title: impl Into<String>,
        description: impl Into<String>,
        list_id: impl Into<ListId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            list_id: list_id.into(),
            member_ids: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: impl Into<MemberId>) -> Self {
        self.member_ids.push(member.into());
        self
    }

    /// One-line summary used in prompts and log lines.
    pub fn summary(&self) -> String {
        format!(
            "Ticket ID: {}\nTitle: {}\nDescription: {}",
            self.id, self.title, self.description
        )
    }
}

/// A board member as resolved through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Username / display name shown on the board.
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
