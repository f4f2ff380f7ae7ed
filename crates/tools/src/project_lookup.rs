//! Project lookup tool: top milestones for a project and query.

use std::sync::Arc;

use async_trait::async_trait;
use riskcast_core::error::ToolError;
use riskcast_core::tool::{Tool, ToolResult};
use riskcast_retrieval::DocumentStore;

/// Default number of milestones returned.
pub const DEFAULT_TOP_K: usize = 3;

pub struct ProjectLookupTool {
    store: Arc<DocumentStore>,
}

impl ProjectLookupTool {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ProjectLookupTool {
    fn name(&self) -> &str {
        "project_lookup"
    }

    fn description(&self) -> &str {
        "Look up the milestones of a project that best match a query. Returns one milestone per paragraph."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Project identifier, e.g. 'proj-001'"
                },
                "query": {
                    "type": "string",
                    "description": "Words to match against milestone dates, titles and notes"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Maximum number of milestones (default 3)",
                    "default": DEFAULT_TOP_K
                }
            },
            "required": ["project_id", "query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let project_id = arguments["project_id"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'project_id' argument".into()))?;
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;
        let top_k = arguments["top_k"]
            .as_u64()
            .map_or(DEFAULT_TOP_K, |k| k as usize);

        let docs = self.store.retrieve(project_id, query, top_k);
        let output = docs.iter().map(|d| d.text.as_str()).collect::<Vec<_>>().join("\n\n");

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
            data: Some(serde_json::to_value(&docs).map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<DocumentStore> {
        Arc::new(
            DocumentStore::from_json(
                r#"{"projects": [{"id": "p1", "name": "Bridge", "milestones": [
                    {"date": "2024-01", "title": "Start", "notes": "kickoff"},
                    {"date": "2024-02", "title": "Delay", "notes": "rain"}
                ]}]}"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn joins_milestones_with_blank_lines() {
        let tool = ProjectLookupTool::new(store());
        let result = tool
            .execute(serde_json::json!({"project_id": "p1", "query": "delay"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "2024-02: Delay - rain\n\n2024-01: Start - kickoff");
        assert_eq!(result.data.unwrap()[0]["score"], 1);
    }

    #[tokio::test]
    async fn respects_top_k() {
        let tool = ProjectLookupTool::new(store());
        let result = tool
            .execute(serde_json::json!({"project_id": "p1", "query": "rain", "top_k": 1}))
            .await
            .unwrap();
        assert_eq!(result.output, "2024-02: Delay - rain");
    }

    #[tokio::test]
    async fn unknown_project_is_empty_output() {
        let tool = ProjectLookupTool::new(store());
        let result = tool
            .execute(serde_json::json!({"project_id": "nope", "query": "rain"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.is_empty());
    }

    #[tokio::test]
    async fn missing_arguments() {
        let tool = ProjectLookupTool::new(store());
        assert!(tool.execute(serde_json::json!({"query": "x"})).await.is_err());
        assert!(tool.execute(serde_json::json!({"project_id": "p1"})).await.is_err());
    }
}
