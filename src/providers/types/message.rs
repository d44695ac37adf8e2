use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::content::{Content, ToolResult, ToolUse};
use super::ids::create_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation.
///
/// The system instruction is not a `Message`: it travels as a separate
/// parameter through `Provider::complete` and the wire layer places it
/// first, so the inference service always sees it at the head of the
/// conversation. Tool results ride in user-role messages and are
/// converted to `role: "tool"` entries on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub id: String,
    pub created: i64,
    pub content: Vec<Content>,
}

impl Message {
    pub fn new(role: Role, content: Vec<Content>) -> Result<Self> {
        let msg = Self {
            role,
            id: create_id("msg"),
            created: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or_default(),
            content,
        };
        msg.validate()?;
        Ok(msg)
    }

    pub fn user(text: &str) -> Result<Self> {
        Self::new(Role::User, vec![Content::text(text)])
    }

    pub fn assistant(text: &str) -> Result<Self> {
        Self::new(Role::Assistant, vec![Content::text(text)])
    }

    /// A user-role message carrying a single tool result, answering the
    /// request with the given call identifier.
    pub fn tool_result(
        tool_use_id: &str,
        tool_name: &str,
        output: &str,
        is_error: bool,
    ) -> Result<Self> {
        Self::new(
            Role::User,
            vec![Content::tool_result(tool_use_id, tool_name, output, is_error)],
        )
    }

    fn validate(&self) -> Result<()> {
        match self.role {
            Role::User => {
                if !self.has_text() && !self.has_tool_result() {
                    return Err(anyhow!("User message must include a Text or ToolResult"));
                }
                if self.has_tool_use() {
                    return Err(anyhow!("User message does not support ToolUse"));
                }
            }
            Role::Assistant => {
                if !self.has_text() && !self.has_tool_use() {
                    return Err(anyhow!("Assistant message must include a Text or ToolUse"));
                }
                if self.has_tool_result() {
                    return Err(anyhow!("Assistant message does not support ToolResult"));
                }
            }
        }
        Ok(())
    }

    /// All text content joined with newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| match content {
                Content::Text(text) => Some(text.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The tool requests carried by this message, in wire order.
    pub fn tool_use(&self) -> Vec<ToolUse> {
        self.content
            .iter()
            .filter_map(|content| match content {
                Content::ToolUse(tool_use) => Some(tool_use.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn tool_results(&self) -> Vec<ToolResult> {
        self.content
            .iter()
            .filter_map(|content| match content {
                Content::ToolResult(tool_result) => Some(tool_result.clone()),
                _ => None,
            })
            .collect()
    }

    fn has_text(&self) -> bool {
        self.content.iter().any(|c| matches!(c, Content::Text(_)))
    }

    fn has_tool_use(&self) -> bool {
        self.content.iter().any(|c| matches!(c, Content::ToolUse(_)))
    }

    fn has_tool_result(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, Content::ToolResult(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() -> Result<()> {
        let message = Message::user("find recent papers")?;
        assert!(matches!(message.role, Role::User));
        assert_eq!(message.text(), "find recent papers");
        Ok(())
    }

    #[test]
    fn test_assistant_message() -> Result<()> {
        let message = Message::assistant("Report body")?;
        assert!(matches!(message.role, Role::Assistant));
        assert_eq!(message.text(), "Report body");
        Ok(())
    }

    #[test]
    fn test_tool_use_accessor() -> Result<()> {
        let message = Message::new(
            Role::Assistant,
            vec![
                Content::tool_use("call_1", "arxiv_search_tool", json!({"query": "novae"})),
                Content::tool_use("call_2", "web_search_tool", json!({"query": "novae"})),
            ],
        )?;

        let requests = message.tool_use();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, "call_1");
        assert_eq!(requests[1].id, "call_2");
        Ok(())
    }

    #[test]
    fn test_tool_result_message() -> Result<()> {
        let message = Message::tool_result("call_1", "arxiv_search_tool", "[]", false)?;
        assert!(matches!(message.role, Role::User));
        let results = message.tool_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tool_use_id, "call_1");
        assert_eq!(results[0].name, "arxiv_search_tool");
        Ok(())
    }

    #[test]
    fn test_role_content_validation() {
        // user carrying a tool request is rejected
        let result = Message::new(
            Role::User,
            vec![Content::tool_use("call_1", "arxiv_search_tool", json!({}))],
        );
        assert!(result.is_err());

        // assistant carrying a tool result is rejected
        let result = Message::new(
            Role::Assistant,
            vec![Content::tool_result("call_1", "arxiv_search_tool", "[]", false)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization() -> Result<()> {
        let message = Message::user("Hello, world!")?;
        let serialized = serde_json::to_string(&message)?;
        let deserialized: Message = serde_json::from_str(&serialized)?;
        assert_eq!(message.text(), deserialized.text());
        assert!(matches!(deserialized.role, Role::User));
        Ok(())
    }
}
