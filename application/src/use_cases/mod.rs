//! Use cases - the orchestration logic between ports

pub mod answer_clarification;
pub mod assign_ticket;
pub mod clarification;
pub mod handle_ticket;
pub mod scan_assignments;
pub mod sync_context;

#[cfg(test)]
pub(crate) mod testing;
