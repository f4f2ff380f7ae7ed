//! Tool agent: runs the relevant tools up front, then asks the model to plan
//! and answer with their outputs in view.
//!
//! Tool selection is deterministic, in this order:
//!
//! 1. a project id runs `project_lookup`, shown to the model as `[rag]`
//! 2. a standalone integer in the task runs `number_fact` when it is
//!    registered, shown as `[numbersapi]` whether or not the lookup worked
//! 3. "calculate" or "what is" runs `calculator` on the arithmetic
//!    characters of the task, shown as `[calc]` only when it evaluated

use std::sync::Arc;

use riskcast_core::error::Result;
use riskcast_core::log::{LogEvent, LogSink};
use riskcast_core::message::Message;
use riskcast_core::tool::{ToolCall, ToolRegistry};
use riskcast_providers::ModelCaller;
use riskcast_tools::{filter_expression, first_integer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool: String,
    pub output: String,
}

impl ToolOutput {
    fn new(tool: &str, output: String) -> Self {
        Self {
            tool: tool.to_string(),
            output,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReply {
    pub model: String,
    pub response: String,
    pub tool_outputs: Vec<ToolOutput>,
    pub latency_ms: u64,
}

/// Labels the model sees for each tool's output.
pub const LOOKUP_LABEL: &str = "rag";
pub const NUMBER_FACT_LABEL: &str = "numbersapi";
pub const CALC_LABEL: &str = "calc";

/// `[label]: output` per line, or "No tools used."
pub fn describe_tools(outputs: &[ToolOutput]) -> String {
    if outputs.is_empty() {
        return "No tools used.".into();
    }
    outputs
        .iter()
        .map(|t| format!("[{}]: {}", t.tool, t.output))
        .collect::<Vec<_>>()
        .join("\n")
}

fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: name.to_string(),
        name: name.to_string(),
        arguments,
    }
}

fn wants_calculation(task: &str) -> bool {
    let lower = task.to_lowercase();
    lower.contains("calculate") || lower.contains("what is")
}

pub struct ToolAgent {
    tools: Arc<ToolRegistry>,
    caller: Arc<ModelCaller>,
    sink: Arc<dyn LogSink>,
    top_k: usize,
}

impl ToolAgent {
    pub fn new(tools: Arc<ToolRegistry>, caller: Arc<ModelCaller>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            tools,
            caller,
            sink,
            top_k: 3,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Run the tools the task calls for, in fixed order.
    pub async fn gather(&self, task: &str, project_id: Option<&str>) -> Result<Vec<ToolOutput>> {
        let mut outputs = Vec::new();

        if let Some(project_id) = project_id {
            let arguments = serde_json::json!({
                "project_id": project_id,
                "query": task,
                "top_k": self.top_k,
            });
            let result = self.tools.execute(&call("project_lookup", arguments)).await?;
            outputs.push(ToolOutput::new(LOOKUP_LABEL, result.output));
        }

        if let Some(number) = first_integer(task).filter(|_| self.tools.contains("number_fact")) {
            let result = self
                .tools
                .execute(&call("number_fact", serde_json::json!({ "number": number })))
                .await?;
            outputs.push(ToolOutput::new(NUMBER_FACT_LABEL, result.output));
        }

        if wants_calculation(task) {
            let expression = filter_expression(task);
            if !expression.trim().is_empty() {
                let result = self
                    .tools
                    .execute(&call("calculator", serde_json::json!({ "expression": expression })))
                    .await?;
                if result.success {
                    outputs.push(ToolOutput::new(CALC_LABEL, result.output));
                } else {
                    debug!(expression = %expression, output = %result.output, "Calculator skipped");
                }
            }
        }

        Ok(outputs)
    }

    pub async fn run(&self, model: &str, task: &str, project_id: Option<&str>) -> Result<AgentReply> {
        let tool_outputs = self.gather(task, project_id).await?;
        let messages = vec![
            Message::system(prompts::AGENT_SYSTEM),
            Message::user(prompts::agent_task(task, &describe_tools(&tool_outputs))),
        ];

        let result = self.caller.call(model, messages).await;
        self.sink.record(
            &LogEvent::new("/agent", "tool_agent", task)
                .model(model)
                .response_len(result.content.len())
                .latency_ms(result.latency_ms)
                .error(result.error.clone()),
        );

        let latency_ms = result.latency_ms;
        let response = result.into_result()?;
        info!(model, tools = tool_outputs.len(), latency_ms, "Agent task answered");

        Ok(AgentReply {
            model: model.to_string(),
            response,
            tool_outputs,
            latency_ms,
        })
    }
}
