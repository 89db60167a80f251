use super::steps::AgentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with access to a web search tool and a weather tool. Use the tools when you need current information, then answer the user directly. Be concise and helpful.";

/// Ordered reasoning steps of one conversation, convertible to OpenAI messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMemory {
    steps: Vec<AgentStep>,
    system_prompt: Option<String>,
}

impl AgentMemory {
    /// Create a new memory with optional system prompt
    pub fn new(system_prompt: Option<String>) -> Self {
        Self {
            steps: Vec::new(),
            system_prompt,
        }
    }

    /// Create memory with default system prompt
    pub fn with_default_system() -> Self {
        Self::new(Some(DEFAULT_SYSTEM_PROMPT.to_string()))
    }

    /// Add a step to memory
    pub fn add_step(&mut self, step: AgentStep) {
        info!(target: "search_agent::steps", "{}", step.describe());
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    pub fn last_step(&self) -> Option<&AgentStep> {
        self.steps.last()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Convert memory to OpenAI message format
    pub fn as_messages(&self) -> Vec<Value> {
        let mut messages = Vec::with_capacity(self.steps.len() + 1);

        if let Some(system_prompt) = &self.system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        messages.extend(self.steps.iter().map(AgentStep::to_message));
        messages
    }

    /// Clear all steps but keep system prompt
    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Check if memory is empty (excluding system prompt)
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn count_actions(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Action { .. }))
            .count()
    }

    pub fn count_observations(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Observation { .. }))
            .count()
    }
}

impl Default for AgentMemory {
    fn default() -> Self {
        Self::with_default_system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_creation() {
        let memory = AgentMemory::new(Some("System".to_string()));
        assert_eq!(memory.step_count(), 0);
        assert!(memory.is_empty());
        assert_eq!(memory.system_prompt(), Some("System"));
    }

    #[test]
    fn test_as_messages() {
        let mut memory = AgentMemory::with_default_system();
        memory.add_step(AgentStep::Task {
            content: "Hello".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 2); // system + task
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn test_no_system_prompt() {
        let mut memory = AgentMemory::new(None);
        memory.add_step(AgentStep::Task {
            content: "Hello".to_string(),
        });
        assert_eq!(memory.as_messages().len(), 1);
    }

    #[test]
    fn test_count_actions_and_observations() {
        let mut memory = AgentMemory::default();
        memory.add_step(AgentStep::Action {
            tool_name: "get_weather".to_string(),
            tool_call_id: "1".to_string(),
            arguments: Value::Null,
        });
        memory.add_step(AgentStep::Observation {
            tool_call_id: "1".to_string(),
            result: "ok".to_string(),
            is_error: false,
        });
        memory.add_step(AgentStep::Action {
            tool_name: "tavily_search".to_string(),
            tool_call_id: "2".to_string(),
            arguments: Value::Null,
        });
        assert_eq!(memory.count_actions(), 2);
        assert_eq!(memory.count_observations(), 1);

        memory.clear_steps();
        assert!(memory.is_empty());
        assert!(memory.system_prompt().is_some());
    }
}
