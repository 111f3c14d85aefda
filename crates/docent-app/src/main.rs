//! Docent binary entry point.
//!
//! Loads configuration, loads the persisted index, connects the
//! OpenAI-compatible clients, and runs the question loop on stdin/stdout.
//! Logs go to stderr.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cli::CliArgs;
use docent_agent::{build_assistant, load_index, ReplError, StdinLines};
use docent_core::config::{api_key, DocentConfig};
use docent_llm::{DynEmbeddingService, LlmClient, OpenAiClient, OpenAiEmbedding};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Configuration. A file that exists but does not parse is fatal.
    let config_file = args.resolve_config_path();
    let loaded = DocentConfig::load_optional(&config_file).with_context(|| {
        format!(
            "failed to load configuration from '{}'",
            config_file.display()
        )
    })?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    config.apply_env_overrides();
    if let Some(dir) = args.resolve_storage_dir() {
        config.index.storage_dir = dir;
    }

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();
    if from_file {
        info!(path = %config_file.display(), "Configuration loaded");
    } else {
        info!(path = %config_file.display(), "No configuration file, using defaults");
    }

    config.validate().context("invalid configuration")?;

    // Storage comes before credentials.
    let index = load_index(&config).with_context(|| {
        format!(
            "failed to load index from storage directory '{}'",
            config.index.storage_dir
        )
    })?;
    let key = api_key()?;

    // Model clients.
    let llm: Arc<dyn LlmClient> = Arc::new(
        OpenAiClient::from_config(&config, key.clone()).context("failed to build LLM client")?,
    );
    let embedder: Arc<dyn DynEmbeddingService> = Arc::new(
        OpenAiEmbedding::from_config(&config, key)
            .context("failed to build embedding client")?,
    );

    let mut repl = build_assistant(&config, index, llm, embedder)
        .context("failed to start assistant")?;

    let input = StdinLines::spawn().context("failed to start console reader")?;
    match repl.run(input, tokio::io::stdout()).await {
        Ok(()) => {}
        Err(err @ ReplError::Interrupted) => {
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
        Err(err) => return Err(err.into()),
    }

    info!("Docent stopped");
    Ok(())
}
