//! Trello REST adapter for the ticket store port

mod client;
mod types;

pub use client::{BoardConfig, TrelloStore};
