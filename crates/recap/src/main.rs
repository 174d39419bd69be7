//! Recap CLI - HTTP gateway for captcha recognition via a multimodal API.
//!
//! Recap accepts base64-encoded captcha images over HTTP, rotates outbound
//! API credentials round-robin, and forwards each image to an external
//! OpenAI-compatible recognition endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Run the gateway (requires API_KEYS=key1,key2,...)
//! recap serve
//!
//! # Run on a different port
//! recap serve --port 8080
//!
//! # View configuration
//! recap config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Recap - captcha recognition gateway with credential rotation.
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match recap_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `recap config path`."
            );
            recap_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("recap v{}", recap_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
