//! Application layer for crewboard
//!
//! Use cases and ports. The use cases drive the ticket lifecycle through
//! three collaborator ports - the ticket board, the repository mirror, and
//! the model gateway - one blocking call at a time. Implementations of the
//! ports live in the infrastructure layer and are injected by the binary.

pub mod ports;
pub mod use_cases;

// Re-export the public surface
pub use ports::llm_gateway::{GatewayError, LlmGateway};
pub use ports::repository_mirror::{MirrorError, RepositoryMirror};
pub use ports::ticket_store::{TicketStore, TicketStoreError};
pub use use_cases::answer_clarification::{AnswerClarification, AnswerClarificationError};
pub use use_cases::assign_ticket::AssignTicket;
pub use use_cases::clarification::{
    AwaitReplyError, ClarificationChannel, PollPolicy,
};
pub use use_cases::handle_ticket::{
    DecompositionOutcome, HandleTicketError, TicketOrchestrator,
};
pub use use_cases::scan_assignments::{AssignmentScanner, ScanError};
pub use use_cases::sync_context::{ContextSynchronizer, SyncContextError};
