//! The publishing stage: one request that converts the report into a
//! complete, self-contained HTML document.

use anyhow::Result;

use crate::artifact::ReportInput;
use crate::providers::base::Provider;
use crate::providers::types::message::Message;

pub const DEFAULT_TEMPERATURE: f32 = 0.5;

const SYSTEM_PROMPT: &str = "You convert plaintext reports into full clean HTML documents.";

/// Convert the report to HTML, returned verbatim apart from trimming.
/// Well-formedness is not validated here; that is the caller's concern.
pub fn convert_to_html(
    provider: &dyn Provider,
    input: &ReportInput,
    model: &str,
    temperature: f32,
) -> Result<String> {
    let report = input.resolve()?;

    let user_prompt = format!(
        "Convert the following research report into a full, clean HTML document. \
         Return ONLY the HTML code, no markdown backticks or explanations. \
         Preserve the citation and reference style of the report.\n\nReport:\n{}",
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

    Ok(reply.text().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentError;
    use crate::providers::mock::MockProvider;

    #[test]
    fn test_returns_trimmed_document() -> Result<()> {
        let provider = MockProvider::new(vec![Message::assistant(
            "\n<html><body><h1>Report</h1></body></html>\n",
        )?]);

        let html = convert_to_html(
            &provider,
            &ReportInput::from("Report body"),
            "test-model",
            DEFAULT_TEMPERATURE,
        )?;

        assert_eq!(html, "<html><body><h1>Report</h1></body></html>");
        Ok(())
    }

    #[test]
    fn test_accepts_conversation_input() -> Result<()> {
        let provider = MockProvider::new(vec![Message::assistant("<html></html>")?]);
        let conversation = vec![Message::user("topic X")?, Message::assistant("Report body")?];

        let html = convert_to_html(
            &provider,
            &ReportInput::from(conversation),
            "test-model",
            DEFAULT_TEMPERATURE,
        )?;

        assert_eq!(html, "<html></html>");
        Ok(())
    }

    #[test]
    fn test_unresolvable_input_errors() -> Result<()> {
        let provider = MockProvider::new(vec![]);
        let conversation: Vec<Message> = vec![Message::user("topic X")?];

        let error = convert_to_html(
            &provider,
            &ReportInput::from(conversation),
            "test-model",
            DEFAULT_TEMPERATURE,
        )
        .unwrap_err();
        let agent_error = error.downcast::<AgentError>()?;

        assert!(matches!(agent_error, AgentError::NoAssistantText));
        Ok(())
    }
}
