use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{AgentError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_RETRIES: usize = 3;

/// Minimal client for OpenAI-compatible chat-completions endpoints
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// POST a chat-completions request, retrying rate limits and server errors
    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let request_url = build_chat_url(&self.base_url);

        let mut attempt = 0;
        let mut backoff = Duration::from_millis(250);

        loop {
            debug!(url = %request_url, attempt, "sending chat completion request");

            let response = client
                .post(&request_url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    warn!(
                        retry_in_ms = retry_after_duration.as_millis() as u64,
                        "rate limited by model API"
                    );
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(AgentError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                warn!(%status, retry_in_ms = backoff.as_millis() as u64, "model API server error");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            let response_json: Value = match serde_json::from_str(&response_text) {
                Ok(value) => value,
                Err(_) if !status.is_success() => {
                    return Err(AgentError::Api(format!(
                        "HTTP {} error: {}",
                        status, response_text
                    )));
                }
                Err(err) => return Err(err.into()),
            };

            if !status.is_success() {
                let api_message = response_json
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or(response_text);

                return Err(AgentError::Api(format!(
                    "HTTP {} error: {}",
                    status, api_message
                )));
            }

            if let Some(error) = response_json.get("error").filter(|error| !error.is_null()) {
                let error_message = error
                    .get("message")
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| error.to_string());
                return Err(AgentError::Api(error_message));
            }

            return Ok(response_json);
        }
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    tools: Vec<Value>,
    tool_choice: Option<Value>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: Value) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if !self.tools.is_empty() {
            body["tools"] = Value::Array(self.tools);
        }

        if let Some(tool_choice) = self.tool_choice {
            body["tool_choice"] = tool_choice;
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:8080/v1/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_omits_empty_fields() {
        let body = ChatCompletionRequest::new("gpt-4o-mini", vec![json!({"role": "user"})])
            .into_value();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_body_with_tools() {
        let body = ChatCompletionRequest::new("gpt-4o-mini", Vec::new())
            .with_tools(vec![json!({"type": "function"})])
            .with_tool_choice(json!("auto"))
            .with_max_tokens(Some(512))
            .into_value();
        assert_eq!(body["tools"].as_array().unwrap().len(), 1);
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["max_tokens"], 512);
    }

    #[tokio::test]
    async fn test_api_error_message_surfaces() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let mut client = OpenAIClient::new("bad-key".to_string());
        client.set_base_url(format!("{}/v1", server.url()));

        let err = client
            .chat_completion(&json!({}), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Api(_)));
        assert!(err.to_string().contains("Incorrect API key provided"));
    }
}
