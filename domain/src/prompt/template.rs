//! Prompt templates for the ticket lifecycle.
//!
//! The exact wording is part of the text protocol: the clarification prompt
//! constrains what the manager persona may ask about, and the decomposition
//! prompt establishes the `@@@@` delimiter convention the parser relies on.

use crate::decompose::parser::TASK_DELIMITER_LINE;
use crate::ticket::entities::Ticket;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt asking the model to raise clarifying questions for a ticket.
    ///
    /// Only ambiguity in business or functional intent is fair game; the
    /// persona is the decision-maker on everything technical and must not
    /// ask about implementation, tooling, process, or timeline.
    pub fn clarification_request(ticket: &Ticket) -> String {
        format!(
            "Given the following ticket details:\n{}\n\
             You are confirming that the business requirements of this ticket \
             are clear. You already know the best technical approaches, \
             including libraries, design patterns, testing frameworks, and \
             coding standards. Do NOT ask about any of those.\n\
             Do NOT ask about:\n\
             - Commenting guidelines or documentation standards.\n\
             - Performance benchmarks or optimizations.\n\
             - Review processes, stakeholder impacts, or timelines.\n\
             - Any technical details regarding libraries, design patterns, or \
             testing frameworks.\n\
             Only ask concise questions about ambiguous or missing business \
             objectives, so you fully understand what the function is about \
             before writing technical tickets. No summaries, headers, or \
             unrelated comments.",
            ticket.summary()
        )
    }

    /// Instruction appended to a clarification reply to obtain the
    /// delimiter-separated task list.
    pub fn decomposition_request(reply: &str) -> String {
        format!(
            "{}\n\
             Given the clarifications above, create a list of atomic technical \
             tickets for the backend developer containing only coding tasks. \
             Each task starts with a concise title on its own line, followed \
             by a precise technical specification. The response must contain \
             ONLY actionable tickets - no extra fields, no general questions \
             or comments. Separate tickets from each other with a line \
             containing exactly {}.",
            reply, TASK_DELIMITER_LINE
        )
    }

    /// One-shot decomposition of a ticket's own description, used when no
    /// clarification round is needed.
    pub fn direct_decomposition(ticket: &Ticket) -> String {
        Self::decomposition_request(&format!(
            "Ticket to decompose:\n{}",
            ticket.summary()
        ))
    }

    /// Prompt demanding a definitive answer to another persona's question.
    pub fn clarification_answer(request: &str) -> String {
        format!(
            "Provide a detailed clarification for the following request from \
             the developer agent. Always answer questions, never ask them - \
             your vision is the source of engineering truth for the project. \
             The question: {}",
            request
        )
    }

    /// Informational context push: no reply is expected from the model.
    pub fn context_update(brief: &str) -> String {
        format!(
            "{}\n\nNote: This information is provided solely to update your \
             internal understanding of the project structure and code base. \
             No response or commentary is needed.",
            brief
        )
    }
}
