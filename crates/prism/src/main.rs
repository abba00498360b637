//! Prism CLI - web frontend for AI prompt refinement and image generation.
//!
//! Prism serves a single page that sends a prompt through a chat model for
//! refinement, then to an image model, and relays the resulting images back
//! to the browser.
//!
//! # Usage
//!
//! ```bash
//! # Run the web frontend on http://127.0.0.1:8000
//! prism serve
//!
//! # Refine a prompt three ways from the terminal
//! prism refine "a cat" -n 3
//!
//! # Generate two images
//! prism generate "a cat wearing a tiny hat" -n 2
//!
//! # View configuration
//! prism config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// Prism - prompt refinement and image generation frontend.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PRISM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web frontend
    Serve(cli::serve::ServeArgs),

    /// Refine a prompt from the terminal
    Refine(cli::refine::RefineArgs),

    /// Generate images from the terminal
    Generate(cli::generate::GenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `config init` may be about to create the file `--config` names.
    let explicit = match &cli.command {
        Commands::Config(_) => None,
        _ => cli.config.as_deref(),
    };
    let config = cli::resolve_config(explicit)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Refine(args) => cli::refine::execute(args, config).await,
        Commands::Generate(args) => cli::generate::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
