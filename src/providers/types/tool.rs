use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool declaration advertised to the model.
///
/// Declarations are immutable: built once at startup by the registry and
/// sent along with every completion request. The `parameters` value is a
/// JSON schema object (`{"type": "object", "properties": ..., "required":
/// ...}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl Tool {
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declaration_shape() {
        let tool = Tool::new(
            "arxiv_search_tool",
            "Searches for research papers on arXiv by query string.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search keywords."}
                },
                "required": ["query"]
            }),
        );

        assert_eq!(tool.name, "arxiv_search_tool");
        assert_eq!(tool.parameters["type"], "object");
        assert_eq!(tool.parameters["required"][0], "query");
    }
}
