//! Synthesis pipeline implementation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::config::TtsSettings;
use crate::model::{BarkModel, ModelError};

use super::segment::{RuleSplitter, SentenceSplitter};

/// End-of-sequence probability floor for semantic generation; lower values
/// bias toward longer, more complete generations.
pub const MIN_EOS_P: f32 = 0.05;

/// Silence inserted after each sentence, in seconds.
pub const SENTENCE_GAP_SECS: f64 = 0.25;

/// Errors that can occur during synthesis.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid character label: {0}")]
    InvalidLabel(String),

    #[error("wav write failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one synthesis invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutput {
    /// Path of the written audio artifact.
    pub path: PathBuf,
    /// Embed tag (plus the annotated text when `show_text`) for the host
    /// to render in place of the generated message.
    pub markup: String,
    /// Text as actually handed to the model, tags included.
    pub annotated_text: String,
}

/// Sequential text-to-audio pipeline.
///
/// One invocation at a time; the caller blocks until the artifact is on
/// disk. The output directory must exist (created during setup).
pub struct SynthesisPipeline<M: BarkModel> {
    model: M,
    splitter: Box<dyn SentenceSplitter>,
    output_dir: PathBuf,
    sequence: AtomicU64,
}

impl<M: BarkModel> SynthesisPipeline<M> {
    pub fn new(model: M, output_dir: PathBuf) -> Self {
        Self {
            model,
            splitter: Box::new(RuleSplitter),
            output_dir,
            sequence: AtomicU64::new(0),
        }
    }

    /// Replace the sentence splitter.
    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Synthesize `text` and persist exactly one WAV artifact.
    ///
    /// Sentences are processed strictly in order, each followed by a
    /// quarter second of silence. Zero sentences still produce a valid
    /// zero-sample artifact.
    pub fn synthesize(
        &self,
        character: &str,
        text: &str,
        settings: &TtsSettings,
    ) -> Result<SynthesisOutput, SynthesisError> {
        validate_label(character)?;

        let annotated = annotate(text, settings);
        let sentences = self.splitter.split(&annotated);
        debug!("synthesizing {} sentences", sentences.len());

        let gap_len = (SENTENCE_GAP_SECS * f64::from(settings.sample_rate)) as usize;
        let mut samples = Vec::new();
        for sentence in &sentences {
            let tokens = self.model.generate_semantic(
                sentence,
                &settings.voice,
                settings.temperature,
                MIN_EOS_P,
            )?;
            let segment = self.model.semantic_to_waveform(&tokens, &settings.voice)?;
            samples.extend_from_slice(&segment);
            samples.resize(samples.len() + gap_len, 0.0);
        }

        let path = self.artifact_path(character);
        write_wav(&path, settings.sample_rate, &samples)?;

        let markup = render_markup(&path, &annotated, settings);
        Ok(SynthesisOutput {
            path,
            markup,
            annotated_text: annotated,
        })
    }

    /// Artifact name: character label, unix seconds, and a per-process
    /// sequence number so same-second requests stay distinct.
    fn artifact_path(&self, character: &str) -> PathBuf {
        let stamp = Utc::now().timestamp();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.output_dir.join(format!("{character}_{stamp}_{seq}.wav"))
    }
}

/// Prefix modifier tags, then the forced speaker tag in front of that, so
/// the speaker tag ends up outermost.
pub fn annotate(text: &str, settings: &TtsSettings) -> String {
    let mut annotated = text.to_string();

    if !settings.modifiers.is_empty() {
        annotated = format!("{}: {annotated}", settings.modifiers.join(" "));
    }

    if let Some(tag) = settings.forced_speaker {
        annotated = format!("{}: {annotated}", tag.prefix());
    }

    annotated
}

fn validate_label(label: &str) -> Result<(), SynthesisError> {
    if label.is_empty() {
        return Err(SynthesisError::InvalidLabel(
            "label cannot be empty".to_string(),
        ));
    }

    // Prevent path traversal through the artifact filename
    if label.contains('/') || label.contains('\\') || label.contains("..") {
        return Err(SynthesisError::InvalidLabel(
            "label cannot contain path separators".to_string(),
        ));
    }

    Ok(())
}

fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) -> Result<(), SynthesisError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

fn render_markup(path: &Path, annotated: &str, settings: &TtsSettings) -> String {
    let autoplay = if settings.autoplay { "autoplay" } else { "" };
    let tag = format!(
        r#"<audio src="file/{}" controls {autoplay}></audio>"#,
        path.display()
    );

    if settings.show_text {
        format!("{tag}<br>{annotated}")
    } else {
        tag
    }
}
