//! The `prism generate` command: one-shot image generation from the terminal.

use crate::server::handlers::GenerateResponse;
use clap::Args;
use prism_core::{Config, ImageGenerator, ProviderFactory};

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Prompt describing the image
    pub prompt: String,

    /// Number of images to request
    #[arg(short, long, default_value_t = 1)]
    pub n: u32,
}

/// Execute the generate command, printing `{"image_urls": [...]}` to stdout.
pub async fn execute(args: GenerateArgs, config: Config) -> anyhow::Result<()> {
    let generator = ImageGenerator::new(ProviderFactory::images(&config.providers)?);
    tracing::info!(
        "Generating {} image(s) with {}",
        args.n,
        generator.provider_name()
    );

    let image_urls = generator.generate(&args.prompt, args.n).await?;

    let body = GenerateResponse { image_urls };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
