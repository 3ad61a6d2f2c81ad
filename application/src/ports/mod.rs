//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! The core performs one blocking external call at a time through these
//! traits; nothing here retries on its own.

pub mod llm_gateway;
pub mod repository_mirror;
pub mod ticket_store;
