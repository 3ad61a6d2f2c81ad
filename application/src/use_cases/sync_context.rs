//! Context synchronization.
//!
//! Pushes repository contents and guidance tickets into the model's context.
//! Both operations are pure priming: no reply is consumed, and a repository
//! refresh fully replaces whatever the model held before. Each successful
//! refresh bumps a [`ContextRevision`] so callers can tell which snapshot
//! generation was active.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::repository_mirror::{MirrorError, RepositoryMirror};
use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use crewboard_domain::{
    ChatMessage, ContextRevision, GuidanceDigest, PromptTemplate, RepositorySnapshot,
    RoleInstruction,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while priming model context
#[derive(Error, Debug)]
pub enum SyncContextError {
    #[error("Failed to read repository files: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Failed to read guidance tickets: {0}")]
    Store(#[from] TicketStoreError),

    #[error("Failed to update model context: {0}")]
    Gateway(#[from] GatewayError),
}

/// Use case pushing repository and board state into the model's context.
pub struct ContextSynchronizer<S, M, G> {
    store: Arc<S>,
    mirror: Arc<M>,
    gateway: Arc<G>,
    guidance_list: String,
    revision: AtomicU64,
}

impl<S: TicketStore, M: RepositoryMirror, G: LlmGateway> ContextSynchronizer<S, M, G> {
    pub fn new(
        store: Arc<S>,
        mirror: Arc<M>,
        gateway: Arc<G>,
        guidance_list: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mirror,
            gateway,
            guidance_list: guidance_list.into(),
            revision: AtomicU64::new(ContextRevision::INITIAL.value()),
        }
    }

    /// The revision of the most recent successful repository refresh.
    pub fn revision(&self) -> ContextRevision {
        ContextRevision::new(self.revision.load(Ordering::SeqCst))
    }

    /// Install a persona's role instruction as the model's system guidance.
    /// Sent once at agent start.
    pub async fn install_role(&self, role: &RoleInstruction) -> Result<(), SyncContextError> {
        self.gateway
            .chat_with_messages(&[ChatMessage::system(role.as_str())])
            .await?;
        info!("persona role installed in model context");
        Ok(())
    }

    /// Read every file from the mirror and push the rendered brief to the
    /// model. Replaces prior repository context entirely; callers relying on
    /// older file content must re-trigger this first.
    pub async fn refresh_repository_context(&self) -> Result<ContextRevision, SyncContextError> {
        let files = self.mirror.read_all_files().await?;
        let snapshot = RepositorySnapshot::new(files);
        debug!(files = snapshot.file_count(), "rendering repository snapshot");

        let prompt = PromptTemplate::context_update(&snapshot.render_brief());
        // The reply is intentionally discarded; this call only primes
        // context, and the gateway displaces the previous snapshot.
        let _ = self.gateway.replace_context(&prompt).await?;

        let revision = ContextRevision::new(self.revision.fetch_add(1, Ordering::SeqCst) + 1);
        info!(%revision, "repository context refreshed");
        Ok(revision)
    }

    /// Aggregate the guidance column into a digest and send it as a system
    /// message. No-ops when the column is empty so the model never receives
    /// a near-empty system message.
    pub async fn load_guidance_digest(
        &self,
    ) -> Result<Option<GuidanceDigest>, SyncContextError> {
        let list = self.store.list_id_by_name(&self.guidance_list).await?;
        let tickets = self.store.board_tickets().await?;

        let Some(digest) = GuidanceDigest::from_tickets(&tickets, &list) else {
            debug!(list = %self.guidance_list, "guidance column empty, nothing sent");
            return Ok(None);
        };

        self.gateway
            .chat_with_messages(&[ChatMessage::system(digest.as_str())])
            .await?;
        info!("guidance digest sent to model");
        Ok(Some(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{RecordingStore, ScriptedGateway, StaticMirror};
    use crewboard_domain::{ChatRole, Ticket};

    fn synchronizer(
        store: RecordingStore,
        mirror: StaticMirror,
        gateway: Arc<ScriptedGateway>,
    ) -> ContextSynchronizer<RecordingStore, StaticMirror, ScriptedGateway> {
        ContextSynchronizer::new(Arc::new(store), Arc::new(mirror), gateway, "IMPORTANT")
    }

    #[tokio::test]
    async fn test_refresh_sends_brief_and_bumps_revision() {
        let gateway = Arc::new(ScriptedGateway::new(vec!["ok".to_string(), "ok".to_string()]));
        let sync = synchronizer(
            RecordingStore::new(),
            StaticMirror::new(&[("src/lib.rs", "pub fn x() {}")]),
            gateway.clone(),
        );

        assert_eq!(sync.revision().value(), 0);
        let r1 = sync.refresh_repository_context().await.unwrap();
        let r2 = sync.refresh_repository_context().await.unwrap();
        assert_eq!(r1.value(), 1);
        assert_eq!(r2.value(), 2);
        assert_eq!(sync.revision(), r2);

        let prompts = gateway.context_prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("File: src/lib.rs"));
        assert!(prompts[0].contains("No response or commentary is needed"));
        // Plain chat traffic is untouched by refreshes.
        assert!(gateway.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_revision_unchanged() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let sync = synchronizer(RecordingStore::new(), StaticMirror::failing(), gateway);

        let err = sync.refresh_repository_context().await.unwrap_err();
        assert!(matches!(err, SyncContextError::Mirror(_)));
        assert_eq!(sync.revision().value(), 0);
    }

    #[tokio::test]
    async fn test_empty_guidance_column_sends_nothing() {
        let store = RecordingStore::new()
            .with_list("IMPORTANT", "list-imp")
            .with_tickets(vec![Ticket::new("t1", "Work", "elsewhere", "other-list")]);
        let gateway = Arc::new(ScriptedGateway::new(vec!["unused".to_string()]));
        let sync = synchronizer(store, StaticMirror::new(&[]), gateway.clone());

        let digest = sync.load_guidance_digest().await.unwrap();
        assert!(digest.is_none());
        assert!(gateway.message_calls().is_empty());
    }

    #[tokio::test]
    async fn test_guidance_digest_sent_as_system_message() {
        let store = RecordingStore::new()
            .with_list("IMPORTANT", "list-imp")
            .with_tickets(vec![Ticket::new(
                "t1",
                "English only",
                "All comments in English",
                "list-imp",
            )]);
        let gateway = Arc::new(ScriptedGateway::new(vec!["ok".to_string()]));
        let sync = synchronizer(store, StaticMirror::new(&[]), gateway.clone());

        let digest = sync.load_guidance_digest().await.unwrap().unwrap();
        assert!(digest.as_str().contains("English only"));

        let calls = gateway.message_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, ChatRole::System);
        assert!(calls[0][0].content.contains("English only"));
    }

    #[tokio::test]
    async fn test_missing_guidance_list_is_surfaced() {
        let store = RecordingStore::new();
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let sync = synchronizer(store, StaticMirror::new(&[]), gateway);

        let err = sync.load_guidance_digest().await.unwrap_err();
        assert!(matches!(
            err,
            SyncContextError::Store(TicketStoreError::ListNotFound(_))
        ));
    }
}
