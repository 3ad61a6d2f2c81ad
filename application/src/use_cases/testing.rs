//! Shared test doubles for use-case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::repository_mirror::{MirrorError, RepositoryMirror};
use crate::ports::ticket_store::{TicketStore, TicketStoreError};
use async_trait::async_trait;
use crewboard_domain::{ChatMessage, ListId, Member, MemberId, Ticket, TicketId};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// In-memory board recording every mutation.
#[derive(Default)]
pub struct RecordingStore {
    lists: HashMap<String, String>,
    tickets: Vec<Ticket>,
    members: HashMap<String, Member>,
    comments: Vec<String>,
    failing_titles: HashSet<String>,
    posted: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, String, String)>>,
    moves: Mutex<Vec<(String, String)>>,
    assignments: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, name: &str, id: &str) -> Self {
        self.lists.insert(name.to_string(), id.to_string());
        self
    }

    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    pub fn with_member(mut self, id: &str, name: &str) -> Self {
        self.members.insert(id.to_string(), Member::new(id, name));
        self
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn failing_creation_for(mut self, title: &str) -> Self {
        self.failing_titles.insert(title.to_string());
        self
    }

    pub fn posted_comments(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }

    pub fn created_tickets(&self) -> Vec<(String, String, String)> {
        self.created.lock().unwrap().clone()
    }

    pub fn moves(&self) -> Vec<(String, String)> {
        self.moves.lock().unwrap().clone()
    }

    pub fn assignments(&self) -> Vec<(String, String)> {
        self.assignments.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketStore for RecordingStore {
    async fn board_tickets(&self) -> Result<Vec<Ticket>, TicketStoreError> {
        Ok(self.tickets.clone())
    }

    async fn list_id_by_name(&self, name: &str) -> Result<ListId, TicketStoreError> {
        self.lists
            .get(name)
            .map(ListId::new)
            .ok_or_else(|| TicketStoreError::ListNotFound(name.to_string()))
    }

    async fn create_ticket(
        &self,
        title: &str,
        description: &str,
        list: &ListId,
    ) -> Result<Ticket, TicketStoreError> {
        if self.failing_titles.contains(title) {
            return Err(TicketStoreError::RequestFailed(format!(
                "creation rejected for '{}'",
                title
            )));
        }
        let mut created = self.created.lock().unwrap();
        created.push((title.to_string(), description.to_string(), list.to_string()));
        Ok(Ticket::new(
            format!("child-{}", created.len()),
            title,
            description,
            list.as_str(),
        ))
    }

    async fn move_ticket(&self, ticket: &TicketId, list: &ListId) -> Result<(), TicketStoreError> {
        self.moves
            .lock()
            .unwrap()
            .push((ticket.to_string(), list.to_string()));
        Ok(())
    }

    async fn assign_member(
        &self,
        ticket: &TicketId,
        member: &MemberId,
    ) -> Result<(), TicketStoreError> {
        self.assignments
            .lock()
            .unwrap()
            .push((ticket.to_string(), member.to_string()));
        Ok(())
    }

    async fn post_comment(&self, _ticket: &TicketId, text: &str) -> Result<(), TicketStoreError> {
        self.posted.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn comments(&self, _ticket: &TicketId) -> Result<Vec<String>, TicketStoreError> {
        Ok(self.comments.clone())
    }

    async fn member(&self, id: &MemberId) -> Result<Member, TicketStoreError> {
        self.members
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| TicketStoreError::MemberNotFound(id.to_string()))
    }

    async fn member_by_name(&self, name: &str) -> Result<Member, TicketStoreError> {
        self.members
            .values()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| TicketStoreError::MemberNotFound(name.to_string()))
    }

    async fn board_members(&self) -> Result<Vec<Member>, TicketStoreError> {
        Ok(self.members.values().cloned().collect())
    }
}

/// Gateway double serving scripted responses and recording every call.
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<String>>,
    fail: bool,
    prompts: Mutex<Vec<String>>,
    message_calls: Mutex<Vec<Vec<ChatMessage>>>,
    context_prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            fail: false,
            prompts: Mutex::new(Vec::new()),
            message_calls: Mutex::new(Vec::new()),
            context_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fail: true,
            prompts: Mutex::new(Vec::new()),
            message_calls: Mutex::new(Vec::new()),
            context_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn message_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.message_calls.lock().unwrap().clone()
    }

    pub fn context_prompts(&self) -> Vec<String> {
        self.context_prompts.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<String, GatewayError> {
        if self.fail {
            return Err(GatewayError::RequestFailed("scripted failure".to_string()));
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn chat(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.next_response()
    }

    async fn chat_with_messages(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        self.message_calls.lock().unwrap().push(messages.to_vec());
        self.next_response()
    }

    async fn replace_context(&self, prompt: &str) -> Result<String, GatewayError> {
        self.context_prompts.lock().unwrap().push(prompt.to_string());
        self.next_response()
    }
}

/// Mirror double serving a fixed file map.
pub struct StaticMirror {
    files: BTreeMap<String, String>,
    fail: bool,
}

impl StaticMirror {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            files: BTreeMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl RepositoryMirror for StaticMirror {
    async fn read_all_files(&self) -> Result<BTreeMap<String, String>, MirrorError> {
        if self.fail {
            return Err(MirrorError::Git("scripted failure".to_string()));
        }
        Ok(self.files.clone())
    }

    async fn write_file(&self, _path: &str, _content: &[u8]) -> Result<(), MirrorError> {
        Ok(())
    }

    async fn commit(&self, _message: &str) -> Result<(), MirrorError> {
        Ok(())
    }

    async fn push(&self) -> Result<(), MirrorError> {
        Ok(())
    }

    async fn pull(&self) -> Result<(), MirrorError> {
        Ok(())
    }
}
