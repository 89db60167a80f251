use crate::error::AgentError;
use serde_json::Value;

/// Extract tool_call_id from a tool call JSON object
pub(super) fn extract_tool_call_id(tool_call: &Value) -> &str {
    tool_call
        .get("id")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
}

/// Extract the function object and its name from a tool call
pub(super) fn extract_function_info(tool_call: &Value) -> Option<(&Value, Option<&str>)> {
    let function = tool_call.get("function")?;
    let function_name = function.get("name").and_then(|value| value.as_str());
    Some((function, function_name))
}

/// Extract arguments string from function object
pub(super) fn extract_arguments_str(function: &Value) -> &str {
    function
        .get("arguments")
        .and_then(|value| value.as_str())
        .unwrap_or("")
}

/// Parse function arguments from JSON string; an empty string means no arguments
pub(super) fn parse_function_arguments(
    arguments_str: &str,
    function_name: &str,
) -> Result<Value, AgentError> {
    if arguments_str.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(arguments_str).map_err(|err| {
        AgentError::InvalidFunctionCall(format!(
            "Failed to parse arguments for tool '{}': {}",
            function_name, err
        ))
    })
}

/// Render a tool result as observation text; strings are passed through raw
pub(super) fn observation_text(result: &Value) -> String {
    match result {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_parts() {
        let call = json!({
            "id": "call_1",
            "type": "function",
            "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
        });

        assert_eq!(extract_tool_call_id(&call), "call_1");
        let (function, name) = extract_function_info(&call).unwrap();
        assert_eq!(name, Some("get_weather"));

        let args = parse_function_arguments(extract_arguments_str(function), "get_weather")
            .unwrap();
        assert_eq!(args["city"], "Paris");
    }

    #[test]
    fn test_invalid_arguments() {
        let err = parse_function_arguments("{city:", "get_weather").unwrap_err();
        assert!(matches!(err, AgentError::InvalidFunctionCall(_)));
        assert!(err.to_string().contains("get_weather"));
    }

    #[test]
    fn test_empty_arguments() {
        assert_eq!(parse_function_arguments("", "t").unwrap(), json!({}));
    }

    #[test]
    fn test_observation_text() {
        assert_eq!(observation_text(&json!("plain")), "plain");
        assert_eq!(observation_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
