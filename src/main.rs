//! bark-tts CLI entry point.

use anyhow::{Context, Result};
use bark_tts::assets::{HttpFetcher, Provisioner, default_cache_dir};
use bark_tts::cli::Args;
use bark_tts::config::voice_presets;
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_voices {
        return list_voices();
    }

    if args.download {
        return download_weights(&args);
    }

    eprintln!("No action specified. Use --download to fetch model weights.");
    eprintln!("Run with --help for usage information.");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "bark_tts=debug" } else { "bark_tts=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn list_voices() -> Result<()> {
    println!("Known voice presets:");
    for preset in voice_presets() {
        println!("  {preset}");
    }

    Ok(())
}

fn download_weights(args: &Args) -> Result<()> {
    let cache_dir = args.cache_dir.clone().unwrap_or_else(default_cache_dir);

    println!("Downloading Bark weights to: {}", cache_dir.display());
    println!("  This may take a while on first run.");

    let provisioner = Provisioner::new(HttpFetcher::new(), cache_dir)
        .with_max_attempts(args.retries)
        .with_accept_partial(args.accept_partial);

    provisioner
        .ensure_assets()
        .context("Failed to download model weights")?;

    println!("All model weights are in place.");
    Ok(())
}
