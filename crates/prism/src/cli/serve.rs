//! The `prism serve` command: run the web frontend.

use crate::server::{self, AppState};
use clap::Args;
use prism_core::{Config, ImageGenerator, ImageProxy, ProviderFactory, Refiner};
use std::path::PathBuf;
use std::sync::Arc;

/// Page served at `/` unless `server.index_file` points elsewhere.
const DEFAULT_INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind [default: from config]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind [default: from config]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory served under /static [default: from config]
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Fold command-line overrides into the loaded configuration.
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = dir;
        }
    }
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    let state = build_state(&config)?;
    if !state.static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} does not exist; /static requests will 404",
            state.static_dir.display()
        );
    }

    server::serve(&config.bind_address(), state).await
}

/// Construct providers and services once; every request shares them.
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let refiner = Refiner::new(ProviderFactory::chat(&config.providers)?);
    let generator = ImageGenerator::new(ProviderFactory::images(&config.providers)?);
    tracing::info!(
        "Refining with {} ({}), generating with {} ({})",
        refiner.provider_name(),
        config.providers.groq.model,
        generator.provider_name(),
        config.providers.together.model
    );

    let index_html: Arc<str> = match config.index_file() {
        Some(path) => {
            let html = std::fs::read_to_string(&path).map_err(|e| {
                anyhow::anyhow!("Failed to read index file {}: {e}", path.display())
            })?;
            Arc::from(html)
        }
        None => Arc::from(DEFAULT_INDEX_HTML),
    };

    Ok(AppState {
        refiner: Arc::new(refiner),
        generator: Arc::new(generator),
        proxy: Arc::new(ImageProxy::new()),
        index_html,
        static_dir: config.static_dir(),
    })
}
