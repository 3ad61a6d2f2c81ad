//! Domain layer for crewboard
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tickets as the message bus
//!
//! Agent personas never talk to each other directly. Everything flows through
//! the shared board: a ticket carries the work, its comment stream carries the
//! clarification exchange, and `@name` tags address a specific persona.
//!
//! ## Decomposition
//!
//! The manager persona turns a clarified ticket into a delimiter-separated
//! list of atomic work items. Parsing that list is deliberately total: a
//! malformed segment is dropped and counted, never an error.

pub mod agent;
pub mod context;
pub mod decompose;
pub mod prompt;
pub mod session;
pub mod ticket;

// Re-export commonly used types
pub use agent::{
    identity::{AgentProfile, RoleInstruction},
    mailbox::RecipientTag,
};
pub use context::{
    guidance::GuidanceDigest,
    snapshot::{ContextRevision, RepositorySnapshot},
};
pub use decompose::parser::{parse_task_blocks, ParsedTasks, TaskBlock, TASK_DELIMITER};
pub use prompt::PromptTemplate;
pub use session::message::{ChatMessage, ChatRole};
pub use ticket::{
    entities::{Member, Ticket},
    value_objects::{AgentName, ListId, MemberId, TicketId},
};
