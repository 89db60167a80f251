use crate::{Agent, Settings};
use anyhow::Context;
use clap::{value_parser, Arg, Command};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_PROMPT: &str = "I am going to Melbourne, AU tomorrow for basic female haircut. Suggest me several places to go and then respond the best time to go tomorrow.";
pub const DEFAULT_THREAD: &str = "abc123";

fn command() -> Command {
    Command::new("search-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Ask a tool-calling agent with web search and weather lookups one question")
        .arg(
            Arg::new("prompt")
                .help("The message to send to the agent")
                .index(1)
                .default_value(DEFAULT_PROMPT),
        )
        .arg(
            Arg::new("thread-id")
                .long("thread-id")
                .value_name("ID")
                .help("Conversation thread to run on")
                .default_value(DEFAULT_THREAD),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Model request timeout in seconds")
                .value_parser(value_parser!(u64))
                .default_value("120"),
        )
        .arg(
            Arg::new("max-iterations")
                .short('i')
                .long("max-iterations")
                .value_name("COUNT")
                .help("Maximum agent iterations")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries the conversation, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI entry point for the search-agent binary
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let matches = command().get_matches();

    let settings = Settings::from_env().context("failed to load configuration")?;
    info!(?settings, "configuration loaded");

    // Arguments with default values are always present.
    let prompt = matches
        .get_one::<String>("prompt")
        .map(String::as_str)
        .unwrap_or(DEFAULT_PROMPT);
    let thread_id = matches
        .get_one::<String>("thread-id")
        .map(String::as_str)
        .unwrap_or(DEFAULT_THREAD);
    let timeout_seconds = matches.get_one::<u64>("timeout").copied().unwrap_or(120);
    let max_iterations = matches
        .get_one::<usize>("max-iterations")
        .copied()
        .unwrap_or(crate::core::agent::DEFAULT_MAX_ITERATIONS);

    let agent = Agent::from_settings(&settings)
        .with_timeout(Duration::from_secs(timeout_seconds))
        .with_max_iterations(max_iterations);

    let result = agent
        .run_thread(thread_id, prompt, |step| println!("{}\n", step.pretty()))
        .await;

    match result {
        Ok(run) => {
            info!(
                iterations = run.iterations,
                actions = run.action_count(),
                duration_ms = run.duration.as_millis() as u64,
                "agent execution completed"
            );
            Ok(())
        }
        Err(e) => {
            error!("agent execution failed: {}", e);
            Err(e.into())
        }
    }
}
