//! Process configuration loaded once from the environment.

use crate::error::{AgentError, Result};
use std::fmt;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const TAVILY_MAX_RESULTS: &str = "TAVILY_MAX_RESULTS";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const TAVILY_BASE_URL: &str = "TAVILY_BASE_URL";
pub const OPENWEATHER_URL: &str = "OPENWEATHER_URL";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_RESULTS: u32 = 2;

/// Immutable settings shared by the agent and its tools.
///
/// Secrets are redacted from the `Debug` output so the settings can be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub openai_api_key: String,
    pub tavily_api_key: String,
    pub openweather_api_key: String,
    pub openai_model: String,
    pub tavily_max_results: u32,
    pub openai_base_url: Option<String>,
    pub tavily_base_url: Option<String>,
    pub openweather_url: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Required keys are checked in a fixed order and the first missing one
    /// is reported. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| {
                AgentError::Config(format!("{} not found in environment variables", name))
            })
        };

        let openai_api_key = require(OPENAI_API_KEY)?;
        let tavily_api_key = require(TAVILY_API_KEY)?;
        let openweather_api_key = require(OPENWEATHER_API_KEY)?;

        let openai_model = get(OPENAI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let tavily_max_results = match get(TAVILY_MAX_RESULTS) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                AgentError::Config(format!(
                    "{} must be a non-negative integer, got `{}`",
                    TAVILY_MAX_RESULTS, raw
                ))
            })?,
            None => DEFAULT_MAX_RESULTS,
        };

        Ok(Self {
            openai_api_key,
            tavily_api_key,
            openweather_api_key,
            openai_model,
            tavily_max_results,
            openai_base_url: get(OPENAI_BASE_URL),
            tavily_base_url: get(TAVILY_BASE_URL),
            openweather_url: get(OPENWEATHER_URL),
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("openweather_api_key", &redact(&self.openweather_api_key))
            .field("openai_model", &self.openai_model)
            .field("tavily_max_results", &self.tavily_max_results)
            .field("openai_base_url", &self.openai_base_url)
            .field("tavily_base_url", &self.tavily_base_url)
            .field("openweather_url", &self.openweather_url)
            .finish()
    }
}

fn redact(secret: &str) -> String {
    format!("<redacted, {} chars>", secret.chars().count())
}
