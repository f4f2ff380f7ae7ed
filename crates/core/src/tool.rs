//! Tools the agent runs before it asks the model anything.
//!
//! The tool agent picks tools deterministically from the task text, so a
//! tool here is just a named async function over JSON arguments. The JSON
//! Schema and description are published by `riskcast tools`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// One invocation: which tool, with what arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Echoed back in [`ToolResult::call_id`]
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// What a tool produced.
///
/// A tool that ran but could not do its job (an expression that does not
/// parse, an unknown project) reports `success: false` with a readable
/// `output` instead of an error; `Err` is reserved for bad arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: String,
    pub success: bool,
    /// Text placed in the agent prompt
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Public description of a tool, as listed by `riskcast tools`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key, e.g. "calculator".
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the `arguments` object.
    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError>;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Tools keyed by name. Iteration is in name order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tool`, replacing one registered under the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Run `call` and stamp its id on the result.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self.get(&call.name).ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        let mut result = tool.execute(call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidArguments("text".into()))?;
            Ok(ToolResult {
                call_id: String::new(),
                success: true,
                output: text.to_uppercase(),
                data: None,
            })
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Upper));
        registry
    }

    #[test]
    fn definitions_follow_name_order() {
        let registry = registry();
        assert!(registry.contains("upper"));
        assert!(registry.get("lower").is_none());

        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "upper");
        assert_eq!(defs[0].parameters["required"][0], "text");
    }

    #[tokio::test]
    async fn execute_stamps_call_id() {
        let call = ToolCall {
            id: "call_7".into(),
            name: "upper".into(),
            arguments: serde_json::json!({"text": "slab pour"}),
        };
        let result = registry().execute(&call).await.unwrap();
        assert_eq!(result.output, "SLAB POUR");
        assert_eq!(result.call_id, "call_7");
    }

    #[tokio::test]
    async fn unknown_tool_and_bad_arguments() {
        let registry = registry();
        let missing = ToolCall {
            id: "1".into(),
            name: "lower".into(),
            arguments: serde_json::json!({}),
        };
        assert!(matches!(registry.execute(&missing).await, Err(ToolError::NotFound(_))));

        let bad = ToolCall {
            name: "upper".into(),
            ..missing
        };
        assert!(matches!(registry.execute(&bad).await, Err(ToolError::InvalidArguments(_))));
    }
}
