//! Number fact tool: a math trivia line for an integer, from a Numbers
//! API compatible service (`GET {base_url}/{n}/math`).
//!
//! The lookup never fails the agent. An unreachable or erroring service
//! yields a result with `success: false` and the output
//! [`NUMBER_FACT_UNAVAILABLE`], which the agent still shows the model.

use std::time::Duration;

use async_trait::async_trait;
use riskcast_core::error::ToolError;
use riskcast_core::tool::{Tool, ToolResult};
use tracing::{debug, warn};

pub const DEFAULT_NUMBER_FACT_URL: &str = "http://numbersapi.com";

pub const NUMBER_FACT_UNAVAILABLE: &str = "numbersapi unavailable";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// First run of digits in `text` that stands alone as a word, e.g. `"14"`
/// in "slip of 14 days" but nothing in "phase2".
pub fn first_integer(text: &str) -> Option<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .find(|word| !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()))
}

pub struct NumberFactTool {
    base_url: String,
    client: reqwest::Client,
}

impl NumberFactTool {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "number_fact".into(),
                reason: format!("HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch(&self, number: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(format!("{}/{number}/math", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl Tool for NumberFactTool {
    fn name(&self) -> &str {
        "number_fact"
    }

    fn description(&self) -> &str {
        "Fetch a math fact about a non-negative integer."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "number": {
                    "type": "string",
                    "pattern": "^[0-9]+$",
                    "description": "The integer, as decimal digits"
                }
            },
            "required": ["number"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let number = arguments["number"]
            .as_str()
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ToolError::InvalidArguments("'number' must be decimal digits".into()))?;

        Ok(match self.fetch(number).await {
            Ok(fact) => {
                debug!(number, "Number fact fetched");
                ToolResult {
                    call_id: String::new(),
                    success: true,
                    output: fact.trim().to_string(),
                    data: None,
                }
            }
            Err(e) => {
                warn!(number, error = %e, "Number fact lookup failed");
                ToolResult {
                    call_id: String::new(),
                    success: false,
                    output: NUMBER_FACT_UNAVAILABLE.into(),
                    data: None,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serves `body` with `status` to every connection; returns its base URL.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        url
    }

    #[test]
    fn integer_must_stand_alone() {
        assert_eq!(first_integer("slip of 14 days, then 6 more"), Some("14"));
        assert_eq!(first_integer("phase2 and L3 only"), None);
        assert_eq!(first_integer("(12*3)"), Some("12"));
        assert_eq!(first_integer("no numbers"), None);
    }

    #[tokio::test]
    async fn fact_is_returned_trimmed() {
        let url = serve("200 OK", "14 is the number of days in a fortnight.\n").await;
        let tool = NumberFactTool::new(url).unwrap();

        let result = tool.execute(serde_json::json!({"number": "14"})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "14 is the number of days in a fortnight.");
    }

    #[tokio::test]
    async fn service_error_is_unavailable() {
        let url = serve("503 Service Unavailable", "down").await;
        let tool = NumberFactTool::new(url).unwrap();

        let result = tool.execute(serde_json::json!({"number": "7"})).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.output, NUMBER_FACT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        // Bind then drop, so nothing listens on the port
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let tool = NumberFactTool::new(format!("http://127.0.0.1:{port}")).unwrap();

        let result = tool.execute(serde_json::json!({"number": "7"})).await.unwrap();
        assert_eq!(result.output, NUMBER_FACT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn non_digit_argument_rejected() {
        let tool = NumberFactTool::new(DEFAULT_NUMBER_FACT_URL).unwrap();
        let err = tool.execute(serde_json::json!({"number": "1/../x"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
