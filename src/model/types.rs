//! Model runtime types.

use thiserror::Error;

use crate::config::TtsSettings;

/// Discrete intermediate representation generated from text, later rendered
/// into a waveform.
pub type SemanticTokens = Vec<i64>;

/// Errors surfaced by the model runtime.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The runtime's built-in weight download mechanism failed. This is the
    /// only variant the provisioner recovers from.
    #[error("automatic model download failed: {0}")]
    AutoDownload(String),

    #[error("model load failed: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Per-stage flags handed to the runtime's preload routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadOptions {
    pub text_use_gpu: bool,
    pub text_use_small: bool,
    pub coarse_use_gpu: bool,
    pub coarse_use_small: bool,
    pub fine_use_gpu: bool,
    pub fine_use_small: bool,
    pub codec_use_gpu: bool,
}

impl PreloadOptions {
    /// Derive the stage flags from the current settings: `use_cpu` inverts
    /// to a per-stage GPU flag, `use_small_models` passes through.
    pub fn from_settings(settings: &TtsSettings) -> Self {
        let use_gpu = !settings.use_cpu;
        let use_small = settings.use_small_models;

        Self {
            text_use_gpu: use_gpu,
            text_use_small: use_small,
            coarse_use_gpu: use_gpu,
            coarse_use_small: use_small,
            fine_use_gpu: use_gpu,
            fine_use_small: use_small,
            codec_use_gpu: use_gpu,
        }
    }
}
