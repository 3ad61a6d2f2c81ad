//! Infrastructure layer for crewboard
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod git;
pub mod openai;
pub mod trello;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentsConfig, FileBoardConfig, FileConfig, FileModelConfig,
    FilePollConfig, FileRepoConfig,
};
pub use git::{GitMirror, MirrorSettings};
pub use openai::{ChatBackendConfig, OpenAiGateway};
pub use trello::{BoardConfig, TrelloStore};
