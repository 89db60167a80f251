use super::{tool::ToolRegistry, Tool};
use crate::{schemas::validator::Validator, AgentError, Result};
use serde_json::Value;
use tracing::debug;

/// Factory for creating and managing function/tool execution
#[derive(Debug)]
pub struct FunctionFactory {
    registry: ToolRegistry,
    validator: Validator,
}

impl FunctionFactory {
    /// Create a new function factory that checks arguments against each
    /// tool's JSON schema
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
            validator: Validator::default(),
        }
    }

    /// Replace the argument validator.
    ///
    /// A strict validator picks up the schema of every tool already
    /// registered, unless it was given one for that tool beforehand.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        if let Validator::Strict(strict) = &mut self.validator {
            for tool in self.registry.list() {
                if !strict.has_schema(tool.name()) {
                    strict.register_schema(tool.name(), tool.parameters_schema());
                }
            }
        }
        self
    }

    /// Register a tool with the factory
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        if let Validator::Strict(strict) = &mut self.validator {
            strict.register_schema(tool.name(), tool.parameters_schema());
        }
        self.registry.register(tool);
    }

    /// Execute a function call by name
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| AgentError::ToolNotFound(function_name.to_string()))?;

        self.validator.check(function_name, &parameters)?;

        debug!(tool = function_name, "executing tool");
        tool.execute(parameters).await
    }

    /// Get all available tools for OpenAI function calling
    pub fn get_openai_tools(&self) -> Vec<Value> {
        self.registry.to_openai_tools()
    }

    /// Check if a function exists
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    /// Names of every registered tool
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.registry.list().iter().map(|tool| tool.name()).collect()
    }
}

impl Default for FunctionFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schemas::StrictValidator, tools::WeatherTool};
    use serde_json::json;

    fn weather() -> WeatherTool {
        WeatherTool::new("owm-key").with_endpoint("http://127.0.0.1:1/data/2.5/weather")
    }

    #[tokio::test]
    async fn test_strict_validator_set_after_registration_checks_existing_tools() {
        let mut factory = FunctionFactory::new().with_validator(Validator::SerdeFirst);
        factory.register_tool(weather());

        let factory = factory.with_validator(Validator::Strict(StrictValidator::new()));
        let err = factory
            .execute_function("get_weather", json!({"town": "Melbourne"}))
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Validation(_)));
        assert!(err.to_string().contains("get_weather"));
    }

    #[test]
    fn test_caller_schema_is_kept_when_validator_is_swapped() {
        let mut factory = FunctionFactory::new();
        factory.register_tool(weather());

        let mut strict = StrictValidator::new();
        strict.register_schema("get_weather", json!({"type": "object"}));
        let factory = factory.with_validator(Validator::Strict(strict));

        assert!(factory
            .validator
            .check("get_weather", &json!({"town": "Melbourne"}))
            .is_ok());
    }
}
