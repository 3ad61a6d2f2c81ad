//! Agent personas.
//!
//! A persona is a name plus a fixed role instruction: the system-level text
//! the model receives for every interaction this persona has. Profiles are
//! built once at process start and never change.

use crate::agent::mailbox::RecipientTag;
use crate::ticket::value_objects::AgentName;
use serde::{Deserialize, Serialize};

/// Fixed system-level guidance for a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInstruction(String);

impl RoleInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Role instruction for the engineering-manager persona: analyzes
    /// high-level tickets, clarifies business intent, and decomposes work.
    pub fn manager() -> Self {
        Self::new(
            "You are a highly skilled AI Engineering Manager agent. You analyze \
             high-level ticket descriptions, ask clarifying questions when the \
             business intent is ambiguous, and decompose each ticket into clear, \
             atomic technical tasks. You are the sole decision-maker on tech \
             stack, patterns, testing approach, and libraries, so never ask \
             about those. Never ask about stakeholders, timelines, KPIs, or \
             processes. You are aware that you talk to other AI agents: output \
             only precise questions or technical tickets, with no greetings, \
             encouragement, or closing summaries. After studying the project \
             sources you know the tech stack and do not introduce new languages \
             or libraries unless explicitly asked.",
        )
    }

    /// Role instruction for the backend-developer persona: implements the
    /// technical tickets the manager produces.
    pub fn developer() -> Self {
        Self::new(
            "You are a highly skilled AI backend developer agent with deep \
             expertise in the project's tech stack. You write clean, modular, \
             well-tested code and follow test-driven development. When \
             requirements are ambiguous, ask the engineering manager precise \
             technical questions before proceeding; never ask trivial ones. \
             You are aware that you talk to other AI agents: output only code \
             or precise questions, without formalities or summaries. Stay \
             within the project's existing languages and libraries unless \
             explicitly asked otherwise.",
        )
    }
}

impl std::fmt::Display for RoleInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named persona with its fixed role instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: AgentName,
    pub role: RoleInstruction,
}

impl AgentProfile {
    pub fn new(name: impl Into<AgentName>, role: RoleInstruction) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// The mailbox tag replies to this persona must carry.
    pub fn tag(&self) -> RecipientTag {
        RecipientTag::for_agent(&self.name)
    }
}
