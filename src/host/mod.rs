//! Chat host integration surface.
//!
//! The host calls three entry points: [`BarkExtension::setup`] once at
//! startup, the input hook before a user turn, and the output hook on the
//! generated reply. UI controls bind to the settings store through
//! [`BarkExtension::settings_mut`]; widget layout itself stays in the host.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::assets::{Fetcher, ProvisionError, Provisioner};
use crate::config::{SettingsStore, TtsSettings};
use crate::model::BarkModel;
use crate::pipeline::{SynthesisError, SynthesisPipeline};

/// Host-visible activity indicator for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Typing,
    RecordingVoiceMessage,
}

impl StatusIndicator {
    /// Message the host shows next to the character name.
    pub fn message(&self) -> &'static str {
        match self {
            StatusIndicator::Typing => "*Is typing...*",
            StatusIndicator::RecordingVoiceMessage => "*Is recording a voice message...*",
        }
    }
}

/// The extension as seen by the chat host.
pub struct BarkExtension<M: BarkModel, F: Fetcher> {
    settings: SettingsStore,
    pipeline: SynthesisPipeline<M>,
    provisioner: Provisioner<F>,
    character: String,
    status: StatusIndicator,
    streaming_suppressed: bool,
}

impl<M: BarkModel, F: Fetcher> BarkExtension<M, F> {
    pub fn new(
        model: M,
        fetcher: F,
        settings: TtsSettings,
        cache_dir: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            settings: SettingsStore::new(settings),
            pipeline: SynthesisPipeline::new(model, output_dir),
            provisioner: Provisioner::new(fetcher, cache_dir),
            character: "assistant".to_string(),
            status: StatusIndicator::Typing,
            streaming_suppressed: false,
        }
    }

    /// One-time startup: create the output and cache directories, then
    /// provision the model weights. Failure leaves the host not ready for
    /// synthesis.
    pub fn setup(&self) -> Result<(), ProvisionError> {
        info!("loading Bark TTS extension, first run may take a while");

        fs::create_dir_all(self.pipeline.output_dir())?;
        fs::create_dir_all(self.provisioner.cache_dir())?;

        self.provisioner
            .provision(self.pipeline.model(), self.settings.get())?;

        info!("Bark TTS extension loaded");
        Ok(())
    }

    /// Pre-processing hook. Returns the user text unchanged; while active
    /// it flips the status indicator to a recording notice and suppresses
    /// incremental streaming for the duration of the turn.
    pub fn input_hook(&mut self, text: &str) -> String {
        if !self.settings.get().activate {
            self.status = StatusIndicator::Typing;
            return text.to_string();
        }

        self.status = StatusIndicator::RecordingVoiceMessage;
        self.streaming_suppressed = true;
        text.to_string()
    }

    /// Post-processing hook. When active, synthesizes the generated text
    /// and returns the audio embed markup in its place; errors propagate
    /// for the host to display as a failed turn.
    pub fn output_hook(&mut self, text: &str) -> Result<String, SynthesisError> {
        if !self.settings.get().activate {
            return Ok(text.to_string());
        }

        let snapshot = self.settings.snapshot();
        let result = self.pipeline.synthesize(&self.character, text, &snapshot);

        self.streaming_suppressed = false;
        self.status = StatusIndicator::Typing;

        Ok(result?.markup)
    }

    /// Character identity used in artifact filenames.
    pub fn set_character(&mut self, character: impl Into<String>) {
        self.character = character.into();
    }

    pub fn status(&self) -> StatusIndicator {
        self.status
    }

    pub fn streaming_suppressed(&self) -> bool {
        self.streaming_suppressed
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }
}
