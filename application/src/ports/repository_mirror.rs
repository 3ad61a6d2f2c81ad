//! Repository mirror port
//!
//! Defines the interface to the local clone of the project repository - the
//! source of truth for code context. Serializing pull/commit/push sequences
//! across agent processes is the caller's responsibility.

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during repository mirror operations
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),
}

/// Access to the version-control mirror
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait RepositoryMirror: Send + Sync {
    /// Read every tracked file, keyed by path relative to the repository
    /// root. VCS metadata is excluded; ordering is deterministic.
    async fn read_all_files(&self) -> Result<BTreeMap<String, String>, MirrorError>;

    /// Write content to a file inside the mirror.
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), MirrorError>;

    /// Commit the current working tree with the configured author.
    async fn commit(&self, message: &str) -> Result<(), MirrorError>;

    /// Push the current branch to the remote.
    async fn push(&self) -> Result<(), MirrorError>;

    /// Fetch the remote and fast-forward the current branch.
    async fn pull(&self) -> Result<(), MirrorError>;
}
