//! The two search tools and the registry that dispatches to them.
//!
//! Dispatch goes through `ToolKind`, a closed enumeration of the tools
//! this system knows. Wire names that do not parse into a `ToolKind`
//! are answered with an in-band error record; the loop never aborts
//! because of a single failed dispatch.

pub mod arxiv;
pub mod web;

use anyhow::Result;
use serde_json::{json, Value};

use crate::errors::AgentError;
use crate::providers::types::tool::Tool;
use arxiv::ArxivSearch;
use web::WebSearch;

pub const ARXIV_TOOL_NAME: &str = "arxiv_search_tool";
pub const WEB_TOOL_NAME: &str = "web_search_tool";

/// Result cap applied when a request omits `max_results`, shared by
/// both tools.
pub const DEFAULT_MAX_RESULTS: u64 = 5;

/// The closed set of dispatchable tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SearchPapers,
    SearchWeb,
}

impl ToolKind {
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            ARXIV_TOOL_NAME => Some(ToolKind::SearchPapers),
            WEB_TOOL_NAME => Some(ToolKind::SearchWeb),
            _ => None,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            ToolKind::SearchPapers => ARXIV_TOOL_NAME,
            ToolKind::SearchWeb => WEB_TOOL_NAME,
        }
    }
}

/// Owns the searchers and answers every dispatch with data: successes
/// as result records, failures as `[{"error": ...}]`.
pub struct ToolRegistry {
    papers: ArxivSearch,
    web: WebSearch,
}

impl ToolRegistry {
    pub fn new() -> Result<Self> {
        Ok(Self {
            papers: ArxivSearch::new()?,
            web: WebSearch::new()?,
        })
    }

    /// Registry over caller-built searchers, used by tests to point at
    /// local servers.
    pub fn with_searchers(papers: ArxivSearch, web: WebSearch) -> Self {
        Self { papers, web }
    }

    /// The declarations advertised to the model on every turn.
    pub fn declarations(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                ARXIV_TOOL_NAME,
                "Searches for research papers on arXiv by query string.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search keywords for research papers.",
                        },
                        "max_results": {
                            "type": "integer",
                            "description": "Maximum number of results to return.",
                            "default": 5,
                        },
                    },
                    "required": ["query"],
                }),
            ),
            Tool::new(
                WEB_TOOL_NAME,
                "Performs a general-purpose web search using DuckDuckGo.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search keywords for retrieving information from the web.",
                        },
                        "max_results": {
                            "type": "integer",
                            "description": "Maximum number of results to return.",
                            "default": 5,
                        },
                    },
                    "required": ["query"],
                }),
            ),
        ]
    }

    /// Dispatch one tool request. Always returns a JSON array of
    /// records; unknown names and bad arguments become error records.
    pub fn dispatch(&self, name: &str, args: &Value) -> Value {
        let Some(kind) = ToolKind::from_wire(name) else {
            return error_record(AgentError::ToolNotFound(name.to_string()));
        };

        let Some(query) = args.get("query").and_then(|q| q.as_str()) else {
            return error_record(AgentError::InvalidParameters(format!(
                "{} requires a string 'query' argument",
                name
            )));
        };

        let max_results = args
            .get("max_results")
            .and_then(|m| m.as_u64())
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let records = match kind {
            ToolKind::SearchPapers => self.papers.search(query, max_results),
            ToolKind::SearchWeb => self.web.search(query, max_results),
        };

        Value::Array(records)
    }
}

fn error_record(error: AgentError) -> Value {
    json!([{ "error": error.to_string() }])
}

/// Whether a dispatch result contains an in-band error record.
pub fn is_error_result(result: &Value) -> bool {
    result
        .as_array()
        .map(|records| records.iter().any(|r| r.get("error").is_some()))
        .unwrap_or(false)
}
