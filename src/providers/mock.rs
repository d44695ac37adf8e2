use anyhow::Result;
use std::sync::Mutex;

use super::base::{Provider, Usage};
use super::types::{message::Message, tool::Tool};

/// A provider that returns pre-configured responses in order, for
/// exercising the loop and the single-turn stages without a network.
pub struct MockProvider {
    responses: Mutex<Vec<Message>>,
}

impl MockProvider {
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

impl Provider for MockProvider {
    fn complete(
        &self,
        _model: &str,
        _system: &str,
        _messages: &[Message],
        _tools: &[Tool],
        _temperature: Option<f32>,
        _max_tokens: Option<i32>,
        _stop_sequences: Option<&[String]>,
        _top_p: Option<f32>,
    ) -> Result<(Message, Usage)> {
        let mut responses = self.responses.lock().expect("mock provider lock");
        if responses.is_empty() {
            // Out of scripted replies: answer with an empty message.
            Ok((Message::assistant("")?, Usage::default()))
        } else {
            Ok((responses.remove(0), Usage::default()))
        }
    }
}
