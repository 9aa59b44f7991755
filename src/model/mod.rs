//! Interface to the Bark model runtime.
//!
//! Weight loading, semantic token generation, and vocoding are external
//! capabilities. This module pins down the contract the provisioner and
//! pipeline rely on, allowing tests to substitute deterministic stubs.

mod types;

pub use types::{ModelError, PreloadOptions, SemanticTokens};

/// Trait for the Bark model runtime.
///
/// This abstracts the in-process inference runtime, allowing for mock
/// implementations in tests.
#[cfg_attr(test, mockall::automock)]
pub trait BarkModel: Send + Sync {
    /// Load all model stages into memory, downloading weights through the
    /// runtime's own mechanism if they are missing.
    fn preload(&self, options: &PreloadOptions) -> Result<(), ModelError>;

    /// Generate semantic tokens for one sentence, conditioned on a voice
    /// preset and sampling temperature.
    ///
    /// `min_eos_p` is the end-of-sequence probability floor; lower values
    /// bias toward longer, more complete generations.
    fn generate_semantic(
        &self,
        text: &str,
        voice: &str,
        temperature: f32,
        min_eos_p: f32,
    ) -> Result<SemanticTokens, ModelError>;

    /// Render semantic tokens to a raw waveform conditioned on the same
    /// voice preset.
    fn semantic_to_waveform(&self, tokens: &[i64], voice: &str) -> Result<Vec<f32>, ModelError>;
}
