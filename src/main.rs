//! tool-demo - console front end for the tool dispatch runtime.
//!
//! Subcommands:
//! - `dispatch`: run a JSON array of tool calls against the built-in tools
//! - `ask`: one tool-using turn with the configured model
//! - `translate`: plain prompt, no tools
//! - `tools`: print the tool specs bound to the model

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tool_dispatch::dispatch::{DispatchSummary, Dispatcher, InvocationRequest};
use tool_dispatch::llm::{ChatMessage, ModelClient, OpenAiClient, ToolSession};
use tool_dispatch::tools::{builtin_registry, AmdorenClient, ToolRegistry};
use tool_dispatch::types::{ApiKeys, Config, Provider};

#[derive(Debug, Parser)]
#[command(name = "tool-demo", version, about = "Run LLM tool calls against built-in tools")]
struct Cli {
    /// JSON config file (environment variables still override it)
    #[arg(long, global = true, env = "TOOL_DISPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Model provider (openai or google)
    #[arg(long, global = true)]
    provider: Option<Provider>,

    /// Model name
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dispatch a JSON array of tool calls read from FILE or stdin
    Dispatch { file: Option<PathBuf> },
    /// Ask the model a question with the built-in tools bound
    Ask { prompt: String },
    /// Translate English text without tools
    Translate {
        text: String,
        #[arg(long, default_value = "Italian")]
        to: String,
    },
    /// Print the tool specs sent to the model
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = cli.model {
        config.llm.model = Some(model);
    }

    tool_dispatch::observability::init_tracing(&config.observability);

    let keys = ApiKeys::from_env();
    let registry = Arc::new(registry(&config, &keys)?);
    let dispatcher = Dispatcher::new(registry.clone());

    match cli.command {
        Command::Dispatch { file } => {
            let raw = match file {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };
            let requests: Vec<InvocationRequest> = serde_json::from_str(&raw)?;
            let outcomes = dispatcher.dispatch(&requests).await;
            let summary = DispatchSummary::of(&outcomes);

            println!("{}", serde_json::to_string_pretty(&outcomes)?);
            tracing::info!(succeeded = summary.succeeded, failed = summary.failed, "dispatch finished");
        }

        Command::Ask { prompt } => {
            let client = model_client(&config, &keys)?;
            let session = ToolSession::new(client, dispatcher);
            let report = session.run_turn(&prompt).await?;

            for outcome in &report.outcomes {
                println!("{}({}) = {}", outcome.name, outcome.arguments, outcome.reply_content());
            }
            match report.answer {
                Some(answer) => println!("AI Response: {}", answer),
                None => println!("AI Response: <empty>"),
            }
        }

        Command::Translate { text, to } => {
            let client = model_client(&config, &keys)?;
            let messages = [
                ChatMessage::system(format!("Translate the following from English into {}", to)),
                ChatMessage::user(text),
            ];
            let response = client.complete(&messages, &[]).await?;
            println!("{}", response.content.unwrap_or_default());
        }

        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&registry.bind_specs())?);
        }
    }

    Ok(())
}

/// Built-in tools. Without `AMDOREN_API_KEY` the currency tool still
/// registers; its lookups then fail with the upstream error.
fn registry(config: &Config, keys: &ApiKeys) -> tool_dispatch::Result<ToolRegistry> {
    let api_key = match keys.amdoren() {
        Ok(key) => key.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "currency lookups will be rejected upstream");
            String::new()
        }
    };
    let rates = AmdorenClient::new(config, api_key)?;
    builtin_registry(Arc::new(rates))
}

fn model_client(config: &Config, keys: &ApiKeys) -> tool_dispatch::Result<Arc<dyn ModelClient>> {
    let provider: Provider = config.llm.provider;
    let api_key = keys.for_provider(provider)?;
    let client = OpenAiClient::new(config, api_key)?;
    tracing::info!(%provider, model = client.model(), "model client ready");
    Ok(Arc::new(client))
}
