//! The `prism refine` command: one-shot prompt refinement from the terminal.

use crate::server::handlers::RefineResponse;
use clap::Args;
use prism_core::{Config, ProviderFactory, Refiner};

/// Arguments for the `refine` command.
#[derive(Args, Debug)]
pub struct RefineArgs {
    /// Prompt to refine
    pub prompt: String,

    /// Number of independent refinements
    #[arg(short, long, default_value_t = 1)]
    pub n: usize,
}

/// Execute the refine command, printing `{"refined_prompts": [...]}` to stdout.
pub async fn execute(args: RefineArgs, config: Config) -> anyhow::Result<()> {
    let refiner = Refiner::new(ProviderFactory::chat(&config.providers)?);
    tracing::info!(
        "Refining prompt {} time(s) with {}",
        args.n,
        refiner.provider_name()
    );

    let refined_prompts = refiner.refine_batch(&args.prompt, args.n).await?;

    let body = RefineResponse { refined_prompts };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
