use crate::errors::{AgentError, AgentResult};
use crate::providers::types::message::{Message, Role};

/// Input to the reflection and formatting stages: either the document
/// text itself, or a conversation whose tail holds it.
#[derive(Debug, Clone)]
pub enum ReportInput {
    RawText(String),
    Conversation(Vec<Message>),
}

impl ReportInput {
    /// Resolve to the underlying text. For a conversation, scan from
    /// the end for the most recent assistant message with non-empty
    /// text; error when none exists. Raw text passes through as-is.
    pub fn resolve(&self) -> AgentResult<String> {
        match self {
            ReportInput::RawText(text) => Ok(text.clone()),
            ReportInput::Conversation(messages) => messages
                .iter()
                .rev()
                .filter(|m| matches!(m.role, Role::Assistant))
                .map(|m| m.text())
                .find(|text| !text.trim().is_empty())
                .ok_or(AgentError::NoAssistantText),
        }
    }
}

impl From<&str> for ReportInput {
    fn from(text: &str) -> Self {
        ReportInput::RawText(text.to_string())
    }
}

impl From<String> for ReportInput {
    fn from(text: String) -> Self {
        ReportInput::RawText(text)
    }
}

impl From<Vec<Message>> for ReportInput {
    fn from(messages: Vec<Message>) -> Self {
        ReportInput::Conversation(messages)
    }
}
