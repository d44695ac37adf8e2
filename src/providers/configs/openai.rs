use anyhow::Result;

use super::base::ProviderConfig;

pub const DEFAULT_HOST: &str = "https://api.openai.com/v1";

/// Connection settings for an OpenAI-compatible chat-completions
/// endpoint. `host` is the API base (up to and including the version
/// segment); any backend speaking the same surface works, e.g. Gemini's
/// OpenAI-compatible endpoint.
pub struct OpenAiProviderConfig {
    pub api_key: String,
    pub host: String,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: String, host: String) -> Self {
        Self { api_key, host }
    }
}

impl ProviderConfig for OpenAiProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("OPENAI_API_KEY", true, None)?
            .ok_or_else(|| anyhow::anyhow!("OpenAI API key should be present"))?;

        let host = Self::get_env("OPENAI_API_HOST", false, Some(DEFAULT_HOST.to_string()))?
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self::new(api_key, host))
    }
}
