//! The context retrieval capability as seen by a language-model orchestrator.
//!
//! The orchestrator discovers the tool through [`Tool::definition`] and calls
//! [`Tool::execute`] with the model-produced argument JSON. The returned string
//! is forwarded to the model verbatim, so its shape (a JSON array of
//! `{locality, answer}` objects) must not change.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use faqdb_core::types::ContextRequest;
use faqdb_core::{Error, Result};

use crate::retriever::Retriever;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object.
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn definition(&self) -> ToolDefinition;
    async fn execute(&self, arguments: &str) -> Result<String>;
}

pub struct ContextTool {
    retriever: Retriever,
}

impl ContextTool {
    pub const NAME: &'static str = "get_context";

    pub fn new(retriever: Retriever) -> Self { Self { retriever } }

    pub async fn call(&self, request: &ContextRequest) -> Result<String> {
        self.retriever.query_json(request).await
    }
}

#[async_trait]
impl Tool for ContextTool {
    fn name(&self) -> &str { Self::NAME }

    fn definition(&self) -> ToolDefinition {
        let localities = &self.retriever.settings().localities;
        let mut city = json!({
            "type": "string",
            "description": "Exact locality name to restrict results to; only used when filter is true"
        });
        if !localities.is_empty() {
            city["enum"] = json!(localities);
        }
        ToolDefinition {
            name: Self::NAME.into(),
            description: format!(
                "Retrieve up to {} FAQ entries relevant to a query, optionally restricted to one locality. Returns a JSON array of {{locality, answer}} objects.",
                self.retriever.settings().top_k
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "The user's question" },
                    "filter": { "type": "boolean", "description": "Whether to restrict results to `city`" },
                    "city": city
                },
                "required": ["query", "filter"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let request: ContextRequest =
            serde_json::from_str(arguments).map_err(|e| Error::InvalidRequest(format!("bad {} arguments: {e}", Self::NAME)))?;
        self.call(&request).await
    }
}
