//! atende CLI — serve the chat API or talk to the assistant directly.
//!
//! Usage:
//!   atende serve        — Start the HTTP API server
//!   atende chat         — Interactive chat session in the terminal
//!   atende onboard      — Create a default configuration
//!   atende status       — Show current configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use atende_core::assistant::Assistant;
use atende_core::catalog::Catalog;
use atende_core::config::Config;
use atende_core::model::ModelManager;
use atende_core::provider::http::HttpProvider;
use atende_core::server;

#[derive(Parser)]
#[command(
    name = "atende",
    version,
    about = "A lightweight conversational assistant backend",
    long_about = "atende — pattern-based chat assistant with optional delegation\nto an external text-generation API and guaranteed local fallback."
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Interactive chat session in the terminal
    Chat,

    /// Create or reset the default configuration
    Onboard,

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone();

    match cli.command {
        Some(Commands::Serve) | None => cmd_serve(config_path.as_deref()).await?,
        Some(Commands::Chat) => cmd_chat(config_path.as_deref()).await?,
        Some(Commands::Onboard) => cmd_onboard()?,
        Some(Commands::Status) => cmd_status(config_path.as_deref())?,
    }

    Ok(())
}

// ── Shared setup ────────────────────────────────────────────────────

/// Build the assistant the configuration asks for.
///
/// `use_local_model` wins over `use_api`; since only the dummy handler
/// exists, that mode logs the situation and serves the pattern
/// assistant. `use_api` without a key degrades to local-only with an
/// explicit notice.
fn build_assistant(config: &Config) -> Assistant {
    let catalog = Arc::new(Catalog::builtin());

    if config.assistant.use_local_model {
        let manager = ModelManager::from_config(&config.models);
        tracing::info!(
            models = manager.len(),
            "Local model mode requested; model-backed replies are not wired yet, serving the pattern assistant"
        );
        return Assistant::local(catalog);
    }

    if config.assistant.use_api {
        match config.provider.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                tracing::info!("Delegation enabled");
                let provider = HttpProvider::new(
                    key,
                    &config.provider.api_url,
                    config.assistant.max_tokens,
                    config.assistant.temperature,
                    reqwest::Client::new(),
                );
                return Assistant::new(
                    catalog,
                    Some(Box::new(provider)),
                    config.assistant.confidence_threshold,
                );
            }
            _ => {
                tracing::warn!(
                    "use_api is enabled but no API key is configured (set ATENDE_API_KEY); every request will be answered locally"
                );
            }
        }
    }

    Assistant::local(catalog)
}

// ── Serve command ───────────────────────────────────────────────────

async fn cmd_serve(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load(config_path);
    let assistant = build_assistant(&config);

    println!();
    println!("  atende v{}", env!("CARGO_PKG_VERSION"));
    println!("  Bind:       {}:{}", config.api.host, config.api.port);
    println!("  Delegation: {}", if assistant.delegation_enabled() { "enabled" } else { "disabled" });
    println!();

    server::run(&config, assistant).await
}

// ── Chat command ────────────────────────────────────────────────────

async fn cmd_chat(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load(config_path);
    let mut assistant = build_assistant(&config);

    println!();
    println!("  atende v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Delegation: {}",
        if assistant.delegation_enabled() { "enabled" } else { "disabled" }
    );
    println!();
    println!("  Type your message, /clear to reset history, or /quit to exit.");
    println!("  ─────────────────────────────────────");
    println!();

    let stdin = io::stdin();
    loop {
        print!("  > ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" | "/q" => {
                println!("  Até logo!");
                break;
            }
            "/clear" => {
                assistant.clear_history();
                println!("  Histórico limpo.");
                continue;
            }
            _ => {}
        }

        let reply = assistant.process_message(input).await;
        println!("  {}\n", reply);
    }

    Ok(())
}

// ── Onboard command ─────────────────────────────────────────────────

fn cmd_onboard() -> Result<()> {
    let path = Config::write_default_template()?;
    println!();
    println!("  Configuration created at:");
    println!("     {}", path.display());
    println!();
    println!("  Next steps:");
    println!("  1. Edit the config file (enable use_api and set ATENDE_API_KEY for delegation)");
    println!("  2. Run `atende serve` to start the API");
    println!();
    Ok(())
}

// ── Status command ──────────────────────────────────────────────────

fn cmd_status(config_path: Option<&std::path::Path>) -> Result<()> {
    let default_path = Config::default_path();
    let config = Config::load(config_path);

    println!();
    println!("  atende status");
    println!("  ─────────────────────────────────────");

    if default_path.exists() {
        println!("  Config:     {}", default_path.display());
    } else {
        println!("  Config:     not found, using defaults (run `atende onboard`)");
    }

    println!("  Bind:       {}:{}", config.api.host, config.api.port);
    println!("  CORS:       {}", config.api.cors_origins.join(", "));
    println!(
        "  Mode:       use_api={} use_local_model={}",
        config.assistant.use_api, config.assistant.use_local_model
    );
    println!(
        "  API key:    {}",
        if config.provider.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            "configured"
        } else {
            "not set"
        }
    );
    println!("  Threshold:  {}", config.assistant.confidence_threshold);
    println!("  Models:     {} configured", config.models.len());

    println!();
    Ok(())
}
