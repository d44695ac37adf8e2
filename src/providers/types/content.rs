use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plain text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

/// A tool invocation requested by the model inside an assistant message.
///
/// When the request itself is malformed (bad function name, undecodable
/// arguments) it is still recorded here, flagged with `is_error`, so the
/// loop can answer it with an error record instead of dropping it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    pub parameters: Value,
    #[serde(default)]
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// The serialized outcome of one tool invocation, answering a `ToolUse`
/// with the same identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub name: String,
    pub output: String,
    #[serde(default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    Text(Text),
    ToolUse(ToolUse),
    ToolResult(ToolResult),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(Text { text: text.into() })
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, parameters: Value) -> Self {
        Content::ToolUse(ToolUse {
            id: id.into(),
            name: name.into(),
            parameters,
            is_error: false,
            error_message: None,
        })
    }

    pub fn tool_result(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        output: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Content::ToolResult(ToolResult {
            tool_use_id: tool_use_id.into(),
            name: name.into(),
            output: output.into(),
            is_error,
        })
    }

    pub fn summary(&self) -> String {
        match self {
            Content::Text(t) => format!("content:text\n{}", t.text),
            Content::ToolUse(t) => format!(
                "content:tool_use:{}\nparameters:{}",
                t.name,
                serde_json::to_string(&t.parameters).unwrap_or_default()
            ),
            Content::ToolResult(t) => format!(
                "content:tool_result:{}:error={}\noutput:{}",
                t.name, t.is_error, t.output
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_roundtrip() {
        let content = Content::tool_use("call_1", "arxiv_search_tool", json!({"query": "novae"}));
        let serialized = serde_json::to_string(&content).unwrap();
        let deserialized: Content = serde_json::from_str(&serialized).unwrap();
        match deserialized {
            Content::ToolUse(tu) => {
                assert_eq!(tu.id, "call_1");
                assert_eq!(tu.name, "arxiv_search_tool");
                assert!(!tu.is_error);
            }
            other => panic!("expected ToolUse, got {:?}", other),
        }
    }

    #[test]
    fn test_tool_result_summary_carries_name() {
        let content = Content::tool_result("call_1", "web_search_tool", "[]", false);
        assert!(content.summary().contains("web_search_tool"));
    }
}
