use anyhow::Result;

use crate::errors::AgentError;
use crate::providers::base::Provider;
use crate::providers::types::message::Message;
use crate::tools::{is_error_result, ToolRegistry};

pub const MAX_TURNS: usize = 10;
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

const SYSTEM_PROMPT: &str = "You are a research assistant that can search the web and arXiv to write detailed, \
accurate, and properly sourced research reports.\n\n\
🔍 Use tools when appropriate (e.g., to find scientific papers or web content).\n\
📚 Cite sources whenever relevant. Do NOT omit citations for brevity.\n\
🌐 When possible, include full URLs (arXiv links, web sources, etc.).\n\
✍️ Use an academic tone, organize output into clearly labeled sections, and include \
inline citations or footnotes as needed.\n\
🚫 Do not include placeholder text such as '(citation needed)' or '(citations omitted)'.";

/// The outcome of one research run: the accepted report text plus the
/// full conversation it came from, so later stages may take either.
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub text: String,
    pub messages: Vec<Message>,
}

/// The tool-calling loop: a model, the tool registry, and a bounded
/// number of turns.
pub struct Agent {
    provider: Box<dyn Provider>,
    registry: ToolRegistry,
    model: String,
    max_turns: usize,
    temperature: f32,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider>, registry: ToolRegistry, model: impl Into<String>) -> Self {
        Self {
            provider,
            registry,
            model: model.into(),
            max_turns: MAX_TURNS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Run the bounded loop: complete, append, dispatch any requested
    /// tools in order, feed the results back, repeat. Terminates on the
    /// first assistant message without tool requests; exhausting the
    /// budget mid-request is an error, never a stale answer.
    pub fn research(&self, prompt: &str) -> Result<ReportRun> {
        let tools = self.registry.declarations();
        // The conversation is owned by this invocation and dropped with it.
        let mut messages = vec![Message::user(prompt)?];

        for _ in 0..self.max_turns {
            let (reply, _usage) = self.provider.complete(
                &self.model,
                SYSTEM_PROMPT,
                &messages,
                &tools,
                Some(self.temperature),
                None,
                None,
                None,
            )?;

            let requests = reply.tool_use();
            messages.push(reply.clone());

            if requests.is_empty() {
                let text = reply.text();
                if text.trim().is_empty() {
                    return Err(AgentError::EmptyFinalAnswer.into());
                }
                return Ok(ReportRun { text, messages });
            }

            // One result message per request, in the order received,
            // keyed by the call id it answers.
            for call in requests {
                let result = if call.is_error {
                    serde_json::json!([{
                        "error": call
                            .error_message
                            .clone()
                            .unwrap_or_else(|| "malformed tool request".to_string())
                    }])
                } else {
                    self.registry.dispatch(&call.name, &call.parameters)
                };

                let is_error = is_error_result(&result);
                let output = serde_json::to_string(&result)?;
                messages.push(Message::tool_result(&call.id, &call.name, &output, is_error)?);
            }
        }

        Err(AgentError::TurnsExhausted {
            turns: self.max_turns,
        }
        .into())
    }
}
