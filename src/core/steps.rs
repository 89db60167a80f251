use serde::{Deserialize, Serialize};
use serde_json::Value;

const BANNER_WIDTH: usize = 80;

/// Represents a single step in the agent's reasoning process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStep {
    /// Message provided by the user
    Task { content: String },
    /// Assistant text sent alongside tool calls
    Planning { plan: String },
    /// Action step where the agent calls a tool
    Action {
        tool_name: String,
        tool_call_id: String,
        arguments: Value,
    },
    /// Observation step capturing the result of a tool execution
    Observation {
        tool_call_id: String,
        result: String,
        is_error: bool,
    },
    /// Final answer from the agent
    FinalAnswer { answer: String },
}

impl AgentStep {
    /// Convert step to OpenAI message format
    pub fn to_message(&self) -> Value {
        match self {
            AgentStep::Task { content } => {
                serde_json::json!({
                    "role": "user",
                    "content": content
                })
            }
            AgentStep::Planning { plan } => {
                serde_json::json!({
                    "role": "assistant",
                    "content": plan
                })
            }
            AgentStep::Action {
                tool_name,
                tool_call_id,
                arguments,
            } => {
                serde_json::json!({
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": tool_call_id,
                        "type": "function",
                        "function": {
                            "name": tool_name,
                            "arguments": arguments.to_string()
                        }
                    }]
                })
            }
            AgentStep::Observation {
                tool_call_id,
                result,
                ..
            } => {
                serde_json::json!({
                    "role": "tool",
                    "tool_call_id": tool_call_id,
                    "content": result
                })
            }
            AgentStep::FinalAnswer { answer } => {
                serde_json::json!({
                    "role": "assistant",
                    "content": answer
                })
            }
        }
    }

    /// Get a one-line description of the step
    pub fn describe(&self) -> String {
        match self {
            AgentStep::Task { content } => format!("🧭 Task: {}", content),
            AgentStep::Planning { plan } => format!("🧩 Plan: {}", plan),
            AgentStep::Action {
                tool_name,
                arguments,
                ..
            } => {
                format!("🔧 Action: {}({})", tool_name, arguments)
            }
            AgentStep::Observation {
                result, is_error, ..
            } => {
                if *is_error {
                    format!("❌ Error: {}", result)
                } else {
                    format!("👁 Observation: {}", result)
                }
            }
            AgentStep::FinalAnswer { answer } => format!("✅ Final Answer: {}", answer),
        }
    }

    /// Render the step as a chat transcript block with a role banner
    pub fn pretty(&self) -> String {
        let (role, body) = match self {
            AgentStep::Task { content } => ("Human Message", content.clone()),
            AgentStep::Planning { plan } => ("Ai Message", plan.clone()),
            AgentStep::Action {
                tool_name,
                tool_call_id,
                arguments,
            } => {
                let mut body = format!(
                    "Tool Calls:\n  {} ({})\n Call ID: {}\n  Args:",
                    tool_name, tool_call_id, tool_call_id
                );
                match arguments.as_object() {
                    Some(args) => {
                        for (key, value) in args {
                            let rendered = match value {
                                Value::String(text) => text.clone(),
                                other => other.to_string(),
                            };
                            body.push_str(&format!("\n    {}: {}", key, rendered));
                        }
                    }
                    None => body.push_str(&format!("\n    {}", arguments)),
                }
                ("Ai Message", body)
            }
            AgentStep::Observation { result, .. } => ("Tool Message", result.clone()),
            AgentStep::FinalAnswer { answer } => ("Ai Message", answer.clone()),
        };

        format!("{}\n\n{}", banner(role), body)
    }
}

fn banner(role: &str) -> String {
    format!("{:=^width$}", format!(" {} ", role), width = BANNER_WIDTH)
}
