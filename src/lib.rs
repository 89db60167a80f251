//! search-agent-rs: a small tool-calling agent with web search and weather lookups
//!
//! The agent talks to an OpenAI-compatible chat-completions API and can call two
//! tools: Tavily web search and an OpenWeatherMap current-weather lookup.
//! Conversations are kept per thread id in an in-memory checkpointer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use search_agent_rs::{Agent, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let agent = Agent::from_settings(&settings);
//!
//!     let result = agent
//!         .run_thread("abc123", "What's the weather in Melbourne?", |step| {
//!             println!("{}", step.pretty())
//!         })
//!         .await?;
//!     println!("{}", result.replay());
//!     Ok(())
//! }
//! ```
//!
//! The weather tool can also be used on its own:
//!
//! ```rust,no_run
//! use search_agent_rs::tools::WeatherTool;
//!
//! # async fn demo() {
//! let weather = WeatherTool::new("openweather-api-key");
//! // Never fails: errors come back as descriptive text.
//! println!("{}", weather.get_weather("Melbourne").await);
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub(crate) mod services;
pub mod tools;
pub mod types;

pub use config::Settings;
pub use crate::core::{Agent, AgentMemory, AgentStep, MemorySaver, RunResult, TokenUsage};
pub use error::{AgentError, Result};
pub use schemas::{StrictValidator, Validator};
pub use services::DEFAULT_THREAD_ID;
pub use tools::{FunctionFactory, TavilySearchTool, Tool, WeatherError, WeatherTool};

#[cfg(feature = "cli")]
pub mod cli;
