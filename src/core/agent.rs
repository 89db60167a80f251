use super::{checkpoint::MemorySaver, memory::DEFAULT_SYSTEM_PROMPT};
use crate::{
    config::Settings,
    error::Result,
    services::openai_client::OpenAIClient,
    tools::{FunctionFactory, TavilySearchTool, WeatherTool},
};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Tool-calling agent that loops model calls and tool calls until the model
/// answers directly
#[derive(Debug)]
pub struct Agent {
    openai_client: OpenAIClient,
    function_factory: FunctionFactory,
    model: String,
    system_prompt: Option<String>,
    max_iterations: usize,
    max_tokens: Option<u32>,
    timeout: Duration,
    checkpointer: MemorySaver,
}

impl Agent {
    pub fn new(api_key: String, function_factory: FunctionFactory) -> Self {
        Self {
            openai_client: OpenAIClient::new(api_key),
            function_factory,
            model: crate::config::DEFAULT_MODEL.to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
            checkpointer: MemorySaver::new(),
        }
    }

    /// Build the agent with the web-search and weather tools registered
    pub fn from_settings(settings: &Settings) -> Self {
        let mut function_factory = FunctionFactory::new();
        function_factory.register_tool(TavilySearchTool::from_settings(settings));
        function_factory.register_tool(WeatherTool::from_settings(settings));

        let agent = Self::new(settings.openai_api_key.clone(), function_factory)
            .with_model(settings.openai_model.clone());

        match &settings.openai_base_url {
            Some(base_url) => agent.with_base_url(base_url.clone()),
            None => agent,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_client.set_base_url(base_url);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share a checkpointer with other agents or keep a handle to inspect it
    pub fn with_checkpointer(mut self, checkpointer: MemorySaver) -> Self {
        self.checkpointer = checkpointer;
        self
    }

    pub fn checkpointer(&self) -> &MemorySaver {
        &self.checkpointer
    }

    pub fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) async fn make_raw_request(&self, request_body: &Value) -> Result<Value> {
        self.openai_client
            .chat_completion(request_body, self.timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::from_lookup(|name| match name {
            "OPENAI_API_KEY" => Some("sk".to_string()),
            "TAVILY_API_KEY" => Some("tvly".to_string()),
            "OPENWEATHER_API_KEY" => Some("owm".to_string()),
            "OPENAI_MODEL" => Some("gpt-4o".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_from_settings_registers_tools() {
        let agent = Agent::from_settings(&settings());
        assert_eq!(agent.model(), "gpt-4o");
        assert_eq!(
            agent.function_factory().tool_names(),
            vec!["get_weather", "tavily_search"]
        );
    }

    #[test]
    fn test_builder_defaults() {
        let agent = Agent::new("sk".to_string(), FunctionFactory::new())
            .with_max_iterations(3)
            .with_system_prompt(None);
        assert_eq!(agent.max_iterations(), 3);
        assert_eq!(agent.timeout(), DEFAULT_TIMEOUT);
        assert!(agent.system_prompt().is_none());
        assert!(agent.checkpointer().is_empty());
    }
}
