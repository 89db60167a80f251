use crate::{AgentError, Result};
use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashMap, fmt, sync::Arc};

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validation strategies for tool parameters
#[derive(Debug, Clone)]
pub enum Validator {
    /// Leave checking to each tool's serde deserialization
    SerdeFirst,
    /// Check against the tool's JSON Schema before the tool runs
    Strict(StrictValidator),
}

impl Validator {
    /// Check parameters for `tool_name` before execution
    pub fn check(&self, tool_name: &str, params: &Value) -> Result<()> {
        match self {
            Validator::SerdeFirst => Ok(()),
            Validator::Strict(validator) => validator.check(tool_name, params),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Validator::Strict(StrictValidator::new())
    }
}

/// Fast serde-first validator
pub fn serde_first_validate<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_path_to_error::deserialize(params).map_err(|e| {
        AgentError::Validation(format!(
            "Parameter validation failed at {}: {}",
            e.path(),
            e.inner()
        ))
    })
}

/// Schema compiled at registration, or the reason it could not be compiled
type CompiledSchema = std::result::Result<Arc<JSONSchema>, String>;

/// Strict JSON Schema validator keyed by tool name
#[derive(Clone, Default)]
pub struct StrictValidator {
    schemas: HashMap<String, CompiledSchema>,
}

impl fmt::Debug for StrictValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tools: Vec<&String> = self.schemas.keys().collect();
        tools.sort();
        f.debug_struct("StrictValidator")
            .field("tools", &tools)
            .finish()
    }
}

impl StrictValidator {
    /// Create a new strict validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a schema for a tool.
    ///
    /// A schema that fails to compile is kept as an error and reported by
    /// every later [`check`](Self::check) for that tool.
    pub fn register_schema(&mut self, tool_name: &str, schema: Value) {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map(Arc::new)
            .map_err(|err| err.to_string());
        self.schemas.insert(tool_name.to_string(), compiled);
    }

    pub fn has_schema(&self, tool_name: &str) -> bool {
        self.schemas.contains_key(tool_name)
    }

    /// Check `params` against the schema registered for `tool_name`.
    ///
    /// Tools without a registered schema pass unchecked.
    pub fn check(&self, tool_name: &str, params: &Value) -> Result<()> {
        match self.schemas.get(tool_name) {
            Some(Ok(compiled)) => check_against_schema(tool_name, compiled, params),
            Some(Err(reason)) => Err(AgentError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                tool_name, reason
            ))),
            None => Ok(()),
        }
    }

    /// Check against the tool's schema, then deserialize into `T`
    pub fn validate<T: DeserializeOwned>(&self, tool_name: &str, params: Value) -> Result<T> {
        self.check(tool_name, &params)?;
        serde_first_validate(params)
    }
}

fn check_against_schema(tool_name: &str, compiled: &JSONSchema, params: &Value) -> Result<()> {
    if let Err(errors) = compiled.validate(params) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx >= MAX_SCHEMA_ERRORS {
                truncated = true;
                break;
            }
            let mut path = error.instance_path.to_string();
            if path.is_empty() {
                path = "<root>".to_string();
            }
            details.push(format!("{}: {}", path, error));
        }

        let mut detail_str = details.join("; ");
        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(AgentError::Validation(format!(
            "Arguments for `{}` do not match its schema: {}",
            tool_name, detail_str
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct CityParams {
        city: String,
    }

    fn city_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })
    }

    #[test]
    fn test_serde_first_reports_path() {
        let err = serde_first_validate::<CityParams>(json!({"city": 7})).unwrap_err();
        assert!(matches!(err, AgentError::Validation(_)));
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn test_strict_accepts_valid_params() {
        let mut strict = StrictValidator::new();
        strict.register_schema("get_weather", city_schema());

        let params: CityParams = strict
            .validate("get_weather", json!({"city": "Melbourne"}))
            .unwrap();
        assert_eq!(params.city, "Melbourne");

        let validator = Validator::Strict(strict);
        assert!(validator.check("get_weather", &json!({"city": 3})).is_err());
        assert!(Validator::SerdeFirst
            .check("get_weather", &json!({"city": 3}))
            .is_ok());
    }

    #[test]
    fn test_strict_rejects_missing_field() {
        let mut strict = StrictValidator::new();
        strict.register_schema("get_weather", city_schema());

        let err = strict.check("get_weather", &json!({})).unwrap_err();
        assert!(err.to_string().contains("get_weather"));
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn test_unregistered_tool_passes() {
        let strict = StrictValidator::new();
        assert!(!strict.has_schema("anything"));
        assert!(strict.check("anything", &json!({"x": 1})).is_ok());
    }

    #[test]
    fn test_invalid_schema_is_reported_on_check() {
        let mut strict = StrictValidator::new();
        strict.register_schema("broken", json!({"type": 12}));

        assert!(strict.has_schema("broken"));
        let err = strict.check("broken", &json!({})).unwrap_err();
        assert!(err.to_string().contains("Failed to prepare `broken` schema"));
        assert!(format!("{:?}", strict).contains("broken"));
    }
}
