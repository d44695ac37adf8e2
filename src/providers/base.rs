use anyhow::Result;

use super::types::{message::Message, tool::Tool};

/// Token accounting reported by the inference service, when available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// The inference-service seam: given a conversation and the declared
/// tools, return one assistant message which carries text, tool
/// requests, or both. Tool selection is always automatic — the service
/// is never forced into or barred from calling a tool.
pub trait Provider {
    #[allow(clippy::too_many_arguments)]
    fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
        temperature: Option<f32>,
        max_tokens: Option<i32>,
        stop_sequences: Option<&[String]>,
        top_p: Option<f32>,
    ) -> Result<(Message, Usage)>;
}
