//! Guidance digest.
//!
//! Tickets in the designated guidance column are standing project-wide
//! instructions. They are aggregated into a single text blob and injected
//! into the model as a system message. The digest is recomputed fully on
//! every load; an empty column produces no digest at all, so the model never
//! receives a near-empty system message.

use crate::ticket::entities::Ticket;
use crate::ticket::value_objects::ListId;

/// Aggregated text of every guidance ticket, in board order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceDigest(String);

impl GuidanceDigest {
    /// Build the digest from all board tickets, keeping those in the
    /// guidance column. Returns `None` when the column is empty.
    pub fn from_tickets<'a>(
        tickets: impl IntoIterator<Item = &'a Ticket>,
        guidance_list: &ListId,
    ) -> Option<Self> {
        let mut text = String::from("Guidance Tickets:\n");
        let mut found = false;

        for ticket in tickets {
            if &ticket.list_id != guidance_list {
                continue;
            }
            found = true;
            text.push_str(&format!("Title: {}\n", ticket.title));
            text.push_str(&format!("Details: {}\n\n", ticket.description));
        }

        found.then_some(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GuidanceDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
