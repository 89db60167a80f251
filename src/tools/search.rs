use super::Tool;
use crate::{config::Settings, schemas::parameters_schema_for, schemas::validator, AgentError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Parameters accepted by the search tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Search query to look up on the web
    pub query: String,
}

/// One search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Search results handed back to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// Web search through the Tavily API
#[derive(Debug, Clone)]
pub struct TavilySearchTool {
    api_key: String,
    base_url: String,
    max_results: u32,
    client: Client,
}

impl TavilySearchTool {
    pub fn new(api_key: impl Into<String>, max_results: u32) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            max_results,
            client: Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let tool = Self::new(settings.tavily_api_key.clone(), settings.tavily_max_results);
        match &settings.tavily_base_url {
            Some(url) => tool.with_base_url(url.clone()),
            None => tool,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Run a search and return at most `max_results` hits
    pub async fn search(&self, query: &str) -> crate::Result<SearchResponse> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        debug!(query, max_results = self.max_results, "searching the web");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "query": query,
                "max_results": self.max_results,
            }))
            .send()
            .await
            .map_err(|err| {
                AgentError::ToolExecution(format!("Failed to call Tavily search: {}", err))
            })?;

        if !response.status().is_success() {
            return Err(AgentError::ToolExecution(format!(
                "Tavily search returned status {}",
                response.status()
            )));
        }

        let mut parsed: SearchResponse = response.json().await.map_err(|err| {
            AgentError::ToolExecution(format!("Failed to read Tavily response: {}", err))
        })?;
        parsed.results.truncate(self.max_results as usize);

        Ok(parsed)
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &'static str {
        "tavily_search"
    }

    fn description(&self) -> &'static str {
        "Search the web for current information. Useful for finding places, opening hours, news and recent events."
    }

    fn parameters_schema(&self) -> Value {
        parameters_schema_for::<SearchParams>()
    }

    async fn execute(&self, parameters: Value) -> crate::Result<Value> {
        let params: SearchParams = validator::serde_first_validate(parameters)?;
        let response = self.search(&params.query).await?;
        Ok(serde_json::to_value(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_tolerates_missing_optional_fields() {
        let parsed: SearchResponse = serde_json::from_value(json!({
            "query": "hairdresser melbourne",
            "results": [{"title": "Salon", "url": "https://example.com"}],
            "response_time": 0.4
        }))
        .unwrap();

        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].content, "");
        assert!(parsed.results[0].score.is_none());
    }

    #[test]
    fn test_schema_requires_query() {
        let schema = TavilySearchTool::new("key", 2).parameters_schema();
        assert_eq!(schema["required"], json!(["query"]));
    }
}
