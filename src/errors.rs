use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    /// The turn budget ran out while the model was still requesting
    /// tools, so the loop never produced a final answer.
    #[error("turn budget of {turns} exhausted without a final answer")]
    TurnsExhausted { turns: usize },

    /// The model's terminal message carried no text.
    #[error("the model ended the conversation without any answer text")]
    EmptyFinalAnswer,

    /// A conversation input held no assistant message with text.
    #[error("no assistant text found in messages")]
    NoAssistantText,

    /// The reflection output could not be recovered as the required
    /// two-field JSON object; carries a truncated preview.
    #[error("the reflection output was not valid JSON. Output: {preview}...")]
    MalformedReflection { preview: String },
}

pub type AgentResult<T> = Result<T, AgentError>;
