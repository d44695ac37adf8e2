use anyhow::{anyhow, Result};
use regex::Regex;
use serde_json::{json, Value};

use super::types::{
    content::{Content, Text},
    message::{Message, Role},
    tool::Tool,
};

/// Convert internal messages to the OpenAI chat-completions wire format.
///
/// Text and tool requests stay on the originating message; each tool
/// result becomes its own `role: "tool"` entry keyed by the call id it
/// answers, so the id linkage survives the wire.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role
        });

        let mut output = Vec::new();

        for content in &message.content {
            match content {
                Content::Text(Text { text }) => {
                    converted["content"] = json!(text);
                }
                Content::ToolUse(tool_use) => {
                    let sanitized_name = sanitize_function_name(&tool_use.name);
                    let tool_calls = converted
                        .as_object_mut()
                        .expect("wire message is always an object")
                        .entry("tool_calls")
                        .or_insert(json!([]));

                    tool_calls.as_array_mut().expect("tool_calls is an array").push(json!({
                        "id": tool_use.id,
                        "type": "function",
                        "function": {
                            "name": sanitized_name,
                            "arguments": tool_use.parameters.to_string(),
                        }
                    }));
                }
                Content::ToolResult(tool_result) => {
                    output.push(json!({
                        "role": "tool",
                        "tool_call_id": tool_result.tool_use_id,
                        "name": tool_result.name,
                        "content": tool_result.output,
                    }));
                }
            }
        }

        if converted.get("content").is_some() || converted.get("tool_calls").is_some() {
            output.insert(0, converted);
        }
        messages_spec.extend(output);
    }

    messages_spec
}

/// Convert tool declarations to the OpenAI function-tool specification.
pub fn tools_to_openai_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters,
            }
        }));
    }

    Ok(result)
}

/// Parse an OpenAI chat-completions response into an assistant message.
///
/// Invalid function names and undecodable argument strings are recorded
/// as error-flagged tool requests rather than failing the whole parse —
/// the loop answers those with an in-band error record.
pub fn openai_response_to_message(response: Value) -> Result<Message> {
    let original = response["choices"][0]["message"].clone();
    let mut content = Vec::new();

    if let Some(text) = original.get("content") {
        if let Some(text_str) = text.as_str() {
            content.push(Content::text(text_str));
        }
    }

    if let Some(tool_calls) = original.get("tool_calls").and_then(|t| t.as_array()) {
        for tool_call in tool_calls {
            let id = tool_call["id"].as_str().unwrap_or_default().to_string();
            let function_name = tool_call["function"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let arguments = tool_call["function"]["arguments"]
                .as_str()
                .unwrap_or_default()
                .to_string();

            if !is_valid_function_name(&function_name) {
                content.push(Content::ToolUse(super::types::content::ToolUse {
                    id,
                    name: function_name.clone(),
                    parameters: json!(arguments),
                    is_error: true,
                    error_message: Some(format!(
                        "The provided function name '{}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+",
                        function_name
                    )),
                }));
            } else {
                match serde_json::from_str::<Value>(&arguments) {
                    Ok(params) => {
                        content.push(Content::tool_use(id, function_name, params));
                    }
                    Err(_) => {
                        content.push(Content::ToolUse(super::types::content::ToolUse {
                            id: id.clone(),
                            name: function_name,
                            parameters: json!(arguments),
                            is_error: true,
                            error_message: Some(format!(
                                "Could not interpret tool use parameters for id {}: {}",
                                id, arguments
                            )),
                        }));
                    }
                }
            }
        }
    }

    Message::new(Role::Assistant, content)
}

fn sanitize_function_name(name: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z0-9_-]").expect("static regex");
    re.replace_all(name, "_").to_string()
}

fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static regex");
    re.is_match(name)
}

#[derive(Debug, thiserror::Error)]
#[error("Input message too long. Message: {0}")]
pub struct InitialMessageTooLargeError(String);

pub fn check_openai_context_length_error(error: &Value) -> Option<InitialMessageTooLargeError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(InitialMessageTooLargeError(message))
    } else {
        None
    }
}
