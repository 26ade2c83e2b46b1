//! Resolve command - one-shot metadata resolution without the HTTP layer

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::video::{normalize_metadata, MetadataResolver, SourceUrl};
use crate::infrastructure::resolver::ProcessResolver;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Video URL to resolve
    pub url: String,

    /// Resolver executable, overrides configuration
    #[arg(long)]
    pub program: Option<String>,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

/// Resolve the URL and print its normalized metadata to stdout
pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("loading configuration")?;

    if let Some(program) = args.program {
        config.resolver.program = program;
    }

    let url = SourceUrl::new(args.url)?;
    let resolver = ProcessResolver::from_config(&config.resolver);

    let raw = resolver
        .resolve(&url)
        .await
        .with_context(|| format!("resolving {}", url))?;
    let metadata = normalize_metadata(&raw)?;

    let rendered = if args.compact {
        serde_json::to_string(&metadata)?
    } else {
        serde_json::to_string_pretty(&metadata)?
    };

    println!("{}", rendered);
    Ok(())
}
