//! Trello REST adapter for the [`TicketStore`] port.
//!
//! Thin wrapper over the v1 REST API. Authentication rides on every request
//! as `key`/`token` query parameters. All lookups by name (lists, members)
//! are resolved client-side from full listings, matching the small-board
//! assumption of the scan contract.

use crate::trello::types::{
    comments_in_board_order, CardDto, CommentActionDto, ListDto, MemberDto,
};
use async_trait::async_trait;
use crewboard_application::{TicketStore, TicketStoreError};
use crewboard_domain::{ListId, Member, MemberId, Ticket, TicketId};
use serde::de::DeserializeOwned;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// The actions endpoint pages at 50 by default, which can hide an older
/// tagged reply on a busy ticket. Always request the API maximum.
const ACTIONS_PAGE_LIMIT: &str = "1000";

fn comment_actions_query() -> [(&'static str, &'static str); 2] {
    [("filter", "commentCard"), ("limit", ACTIONS_PAGE_LIMIT)]
}

/// Credentials and board identity for the Trello adapter.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub api_key: String,
    pub api_token: String,
    pub board_id: String,
}

/// Reqwest-based ticket store backed by a single Trello board.
pub struct TrelloStore {
    client: reqwest::Client,
    base_url: String,
    config: BoardConfig,
}

impl TrelloStore {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
        }
    }

    /// Point the adapter at a different endpoint (tests, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("key", self.config.api_key.as_str()),
            ("token", self.config.api_token.as_str()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TicketStoreError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&self.auth())
            .send()
            .await
            .map_err(|e| TicketStoreError::RequestFailed(e.to_string()))?;
        Self::decode(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TicketStoreError> {
        let response = request
            .query(&self.auth())
            .send()
            .await
            .map_err(|e| TicketStoreError::RequestFailed(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TicketStoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TicketStoreError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }
        response
            .json()
            .await
            .map_err(|e| TicketStoreError::InvalidResponse(e.to_string()))
    }

    async fn lists(&self) -> Result<Vec<ListDto>, TicketStoreError> {
        self.get_json(&format!("boards/{}/lists", self.config.board_id))
            .await
    }

    async fn members(&self) -> Result<Vec<MemberDto>, TicketStoreError> {
        self.get_json(&format!("boards/{}/members", self.config.board_id))
            .await
    }
}

#[async_trait]
impl TicketStore for TrelloStore {
    async fn board_tickets(&self) -> Result<Vec<Ticket>, TicketStoreError> {
        let cards: Vec<CardDto> = self
            .get_json(&format!("boards/{}/cards", self.config.board_id))
            .await?;
        debug!(cards = cards.len(), "fetched board cards");
        Ok(cards.into_iter().map(Ticket::from).collect())
    }

    async fn list_id_by_name(&self, name: &str) -> Result<ListId, TicketStoreError> {
        self.lists()
            .await?
            .into_iter()
            .find(|list| list.name.eq_ignore_ascii_case(name))
            .map(|list| ListId::new(list.id))
            .ok_or_else(|| TicketStoreError::ListNotFound(name.to_string()))
    }

    async fn create_ticket(
        &self,
        title: &str,
        description: &str,
        list: &ListId,
    ) -> Result<Ticket, TicketStoreError> {
        let card: CardDto = self
            .send_json(self.client.post(self.url("cards")).query(&[
                ("idList", list.as_str()),
                ("name", title),
                ("desc", description),
            ]))
            .await?;
        Ok(card.into())
    }

    async fn move_ticket(&self, ticket: &TicketId, list: &ListId) -> Result<(), TicketStoreError> {
        let _: CardDto = self
            .send_json(
                self.client
                    .put(self.url(&format!("cards/{}", ticket)))
                    .query(&[("idList", list.as_str())]),
            )
            .await?;
        Ok(())
    }

    async fn assign_member(
        &self,
        ticket: &TicketId,
        member: &MemberId,
    ) -> Result<(), TicketStoreError> {
        let _: serde_json::Value = self
            .send_json(
                self.client
                    .post(self.url(&format!("cards/{}/idMembers", ticket)))
                    .query(&[("value", member.as_str())]),
            )
            .await?;
        Ok(())
    }

    async fn post_comment(&self, ticket: &TicketId, text: &str) -> Result<(), TicketStoreError> {
        let _: serde_json::Value = self
            .send_json(
                self.client
                    .post(self.url(&format!("cards/{}/actions/comments", ticket)))
                    .query(&[("text", text)]),
            )
            .await?;
        Ok(())
    }

    async fn comments(&self, ticket: &TicketId) -> Result<Vec<String>, TicketStoreError> {
        let actions: Vec<CommentActionDto> = self
            .send_json(
                self.client
                    .get(self.url(&format!("cards/{}/actions", ticket)))
                    .query(&comment_actions_query()),
            )
            .await?;
        Ok(comments_in_board_order(actions))
    }

    async fn member(&self, id: &MemberId) -> Result<Member, TicketStoreError> {
        let member: MemberDto = self.get_json(&format!("members/{}", id)).await?;
        Ok(member.into())
    }

    async fn member_by_name(&self, name: &str) -> Result<Member, TicketStoreError> {
        self.members()
            .await?
            .into_iter()
            .find(|member| member.is_named(name))
            .map(Member::from)
            .ok_or_else(|| TicketStoreError::MemberNotFound(name.to_string()))
    }

    async fn board_members(&self) -> Result<Vec<Member>, TicketStoreError> {
        Ok(self
            .members()
            .await?
            .into_iter()
            .map(Member::from)
            .collect())
    }
}
