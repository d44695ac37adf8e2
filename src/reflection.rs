//! The self-critique stage: one structured request that returns a
//! critique and a revised version of the report.

use anyhow::Result;
use serde_json::Value;

use crate::artifact::ReportInput;
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::Provider;
use crate::providers::types::message::Message;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "You are an academic reviewer and editor.";

const PREVIEW_CHARS: usize = 100;

/// The two-field reflection payload. Either both fields are recovered
/// or the call fails; a field missing from an otherwise-valid payload
/// defaults to the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    pub reflection: String,
    pub revised_report: String,
}

/// Critique the report and produce a revised version.
///
/// Accepts raw text or a conversation ending in assistant text. The
/// model is instructed to answer with only a JSON object carrying the
/// two fields; parsing tolerates code fences and surrounding prose.
pub fn reflect_and_rewrite(
    provider: &dyn Provider,
    input: &ReportInput,
    model: &str,
    temperature: f32,
) -> Result<Reflection> {
    let report = input.resolve()?;

    let user_prompt = format!(
        "Review the following report and generate a reflection and a revised version.\n\
         Return ONLY valid JSON with the following structure:\n\
         {{\n\
             \"reflection\": \"Your reflection here. MUST include the following 4 sections: \
         'Strengths:', 'Limitations:', 'Suggestions:', 'Opportunities:'.\",\n\
             \"revised_report\": \"Your revised report here\"\n\
         }}\n\n\
         Report:\n{}",
        report
    );

    let (reply, _usage) = provider.complete(
        model,
        SYSTEM_PROMPT,
        &[Message::user(&user_prompt)?],
        &[],
        Some(temperature),
        None,
        None,
        None,
    )?;

    let payload = parse_reflection_payload(&reply.text())?;

    Ok(Reflection {
        reflection: field_as_trimmed_string(&payload, "reflection"),
        revised_report: field_as_trimmed_string(&payload, "revised_report"),
    })
}

/// Two-phase defensive parse: fence strip + strict parse first, then a
/// bounded fallback on the substring between the outermost braces.
fn parse_reflection_payload(raw: &str) -> AgentResult<Value> {
    let cleaned = strip_code_fence(raw.trim());

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Ok(value);
    }

    extract_brace_window(cleaned)
        .and_then(|window| serde_json::from_str::<Value>(window).ok())
        .ok_or_else(|| AgentError::MalformedReflection {
            preview: cleaned.chars().take(PREVIEW_CHARS).collect(),
        })
}

/// Remove a wrapping markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw;
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// The substring spanning the first `{` through the last `}`, when both
/// exist in order.
fn extract_brace_window(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn field_as_trimmed_string(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
