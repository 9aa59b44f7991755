//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::assets::DEFAULT_MAX_ATTEMPTS;

/// Model weight maintenance for the Bark TTS extension.
#[derive(Parser, Debug)]
#[command(name = "bark-tts")]
#[command(about = "Download Bark model weights and inspect voice presets")]
#[command(version)]
pub struct Args {
    /// Download any missing model weights into the local cache
    #[arg(short, long)]
    pub download: bool,

    /// Cache directory for model weights (defaults to MODEL_PATH or the user cache dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Download attempts per weight file
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub retries: u32,

    /// Keep a truncated download after retries are exhausted
    #[arg(long)]
    pub accept_partial: bool,

    /// List the known voice presets
    #[arg(long)]
    pub list_voices: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
