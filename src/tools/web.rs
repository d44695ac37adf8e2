use anyhow::Result;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; scribe-agent/1.0)";

/// General web search via the DuckDuckGo HTML endpoint (no API key).
///
/// Same contract as the paper search: one best-effort call, results in
/// upstream relevance order, failures returned as an in-band
/// `{"error": ...}` record.
pub struct WebSearch {
    client: Client,
    base_url: String,
}

impl WebSearch {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn search(&self, query: &str, max_results: u64) -> Vec<Value> {
        let url = format!(
            "{}/html/?q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let html = match self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
        {
            Ok(html) => html,
            Err(e) => return vec![json!({"error": e.to_string()})],
        };

        extract_results(&html, max_results)
    }
}

/// Pull result records out of the DuckDuckGo HTML page. The endpoint
/// has no count parameter, so the cap is applied here.
fn extract_results(html: &str, max_results: u64) -> Vec<Value> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() as u64 >= max_results {
            break;
        }

        let title = chunk
            .split("class=\"result__a\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("");

        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("");

        let url = chunk
            .split("class=\"result__url\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .map(str::trim)
            .unwrap_or("");

        if !title.is_empty() {
            results.push(json!({
                "title": html_decode(title),
                "content": html_decode(snippet),
                "url": url,
            }));
        }
    }

    results
}

fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
}
