use crate::{
    core::{agent::Agent, memory::AgentMemory, steps::AgentStep},
    error::{AgentError, Result},
    services::{
        openai_client::ChatCompletionRequest,
        tool_call_utils::{
            extract_arguments_str, extract_function_info, extract_tool_call_id,
            observation_text, parse_function_arguments,
        },
    },
    types::result::{RunResult, TokenUsage},
};
use serde_json::{json, Value};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{info, warn};

/// Thread used by [`Agent::run`] and [`Agent::run_with_steps`]
pub const DEFAULT_THREAD_ID: &str = "default";

/// Tool name recorded for a model tool call that carries no function name
const UNKNOWN_TOOL_NAME: &str = "unknown";

/// Records steps into memory and forwards each one to the caller's observer
struct StepRecorder<'a, F: FnMut(&AgentStep)> {
    memory: &'a mut AgentMemory,
    on_step: F,
}

impl<'a, F: FnMut(&AgentStep)> StepRecorder<'a, F> {
    fn record(&mut self, step: AgentStep) {
        (self.on_step)(&step);
        self.memory.add_step(step);
    }

    fn record_error(&mut self, tool_call_id: &str, error: &AgentError) {
        self.record(AgentStep::Observation {
            tool_call_id: tool_call_id.to_string(),
            result: error.to_error_payload().to_string(),
            is_error: true,
        });
    }
}

impl Agent {
    /// Run one turn on the default thread and return the final answer
    pub async fn run(&self, prompt: &str) -> Result<String> {
        Ok(self.run_with_steps(prompt).await?.output)
    }

    /// Run one turn on the default thread and return the full trace
    pub async fn run_with_steps(&self, prompt: &str) -> Result<RunResult> {
        self.run_thread(DEFAULT_THREAD_ID, prompt, |_| {}).await
    }

    /// Run one turn on `thread_id`, continuing any conversation saved for it.
    ///
    /// `on_step` sees every step as it is recorded, starting with the user's
    /// message. The thread's memory is saved whether or not the turn reaches a
    /// final answer.
    pub async fn run_thread<F>(&self, thread_id: &str, prompt: &str, on_step: F) -> Result<RunResult>
    where
        F: FnMut(&AgentStep),
    {
        let start_time = Instant::now();
        let mut memory = self
            .checkpointer()
            .load(thread_id)
            .unwrap_or_else(|| AgentMemory::new(self.system_prompt().map(str::to_string)));
        let turn_start = memory.step_count();

        info!(thread_id, model = self.model(), "starting agent turn");

        let outcome = {
            let mut recorder = StepRecorder {
                memory: &mut memory,
                on_step,
            };
            recorder.record(AgentStep::Task {
                content: prompt.to_string(),
            });
            self.drive(&mut recorder).await
        };

        let steps = memory.steps()[turn_start..].to_vec();
        self.checkpointer().save(thread_id, memory);

        let (output, tokens, iterations) = outcome?;
        info!(thread_id, iterations, "agent turn completed");

        Ok(RunResult::new(
            output,
            steps,
            tokens,
            start_time.elapsed(),
            iterations,
        ))
    }

    async fn drive<F: FnMut(&AgentStep)>(
        &self,
        recorder: &mut StepRecorder<'_, F>,
    ) -> Result<(String, Option<TokenUsage>, usize)> {
        let tools = self.function_factory().get_openai_tools();
        let mut token_total: Option<TokenUsage> = None;

        for iteration in 1..=self.max_iterations() {
            let mut chat_request =
                ChatCompletionRequest::new(self.model(), recorder.memory.as_messages())
                    .with_max_tokens(self.max_tokens());

            if !tools.is_empty() {
                chat_request = chat_request
                    .with_tools(tools.clone())
                    .with_tool_choice(json!("auto"));
            }

            let request_body = chat_request.into_value();

            let response = timeout(self.timeout(), self.make_raw_request(&request_body))
                .await
                .map_err(|_| AgentError::Timeout("Model API call timed out".to_string()))??;

            if let Some(usage) = TokenUsage::from_response(&response) {
                token_total.get_or_insert_with(TokenUsage::default).add(usage);
            }

            let assistant_message = first_assistant_message(&response)?;

            let tool_calls = assistant_message
                .get("tool_calls")
                .and_then(|value| value.as_array())
                .filter(|calls| !calls.is_empty());

            let content = assistant_message
                .get("content")
                .and_then(|value| value.as_str())
                .unwrap_or("")
                .trim()
                .to_string();

            let Some(tool_calls) = tool_calls else {
                recorder.record(AgentStep::FinalAnswer {
                    answer: content.clone(),
                });
                return Ok((content, token_total, iteration));
            };

            if !content.is_empty() {
                recorder.record(AgentStep::Planning { plan: content });
            }

            for tool_call in tool_calls {
                self.handle_tool_call(tool_call, recorder).await;
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations()))
    }

    async fn handle_tool_call<F: FnMut(&AgentStep)>(
        &self,
        tool_call: &Value,
        recorder: &mut StepRecorder<'_, F>,
    ) {
        let tool_call_id = extract_tool_call_id(tool_call);

        let (function, function_name) = match extract_function_info(tool_call) {
            Some((function, Some(name))) if !name.is_empty() => (function, name),
            _ => {
                // Each tool message must answer an assistant tool call, so the
                // nameless call is still recorded to keep the history valid.
                recorder.record(AgentStep::Action {
                    tool_name: UNKNOWN_TOOL_NAME.to_string(),
                    tool_call_id: tool_call_id.to_string(),
                    arguments: Value::Object(Default::default()),
                });
                recorder.record_error(
                    tool_call_id,
                    &AgentError::InvalidFunctionCall(
                        "Tool call missing function name".to_string(),
                    ),
                );
                return;
            }
        };

        let arguments = match parse_function_arguments(
            extract_arguments_str(function),
            function_name,
        ) {
            Ok(arguments) => arguments,
            Err(err) => {
                recorder.record(AgentStep::Action {
                    tool_name: function_name.to_string(),
                    tool_call_id: tool_call_id.to_string(),
                    arguments: Value::Object(Default::default()),
                });
                recorder.record_error(tool_call_id, &err);
                return;
            }
        };

        recorder.record(AgentStep::Action {
            tool_name: function_name.to_string(),
            tool_call_id: tool_call_id.to_string(),
            arguments: arguments.clone(),
        });

        match self
            .function_factory()
            .execute_function(function_name, arguments)
            .await
        {
            Ok(result) => recorder.record(AgentStep::Observation {
                tool_call_id: tool_call_id.to_string(),
                result: observation_text(&result),
                is_error: false,
            }),
            Err(err) => {
                warn!(tool = function_name, error = %err, "tool call failed");
                recorder.record_error(tool_call_id, &err);
            }
        }
    }
}

fn first_assistant_message(response: &Value) -> Result<&Value> {
    let choices = response
        .get("choices")
        .and_then(|value| value.as_array())
        .ok_or_else(|| {
            AgentError::Api("Missing 'choices' array in completion response".to_string())
        })?;

    let first_choice = choices
        .first()
        .ok_or_else(|| AgentError::Api("Completion response contained no choices".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| AgentError::Api("Completion response missing assistant message".to_string()))
}
