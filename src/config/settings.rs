//! Runtime settings and the store that owns them.

use std::env;

use serde::{Deserialize, Serialize};

/// Bark's native playback rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Voice preset used when the host has not picked one.
pub const DEFAULT_VOICE: &str = "v2/en_speaker_3";

/// Annotation strings the host offers in its modifier picker.
pub const MODIFIER_OPTIONS: &[&str] = &[
    "[laughter]",
    "[laughs]",
    "[sighs]",
    "[music]",
    "[gasps]",
    "[clears throat]",
];

/// Environment variable selecting the small model variants at load time.
pub const USE_SMALL_MODELS_VAR: &str = "USE_SMALL_MODELS";

/// Environment variable forcing CPU-only inference at load time.
pub const USE_CPU_VAR: &str = "USE_CPU";

/// Languages with v2 speaker presets.
const PRESET_LANGS: &[&str] = &[
    "de", "en", "es", "fr", "hi", "it", "ja", "ko", "pl", "pt", "ru", "tr", "zh",
];

/// Known history prompts, sorted.
pub fn voice_presets() -> Vec<String> {
    let mut presets = vec!["announcer".to_string()];
    for lang in PRESET_LANGS {
        for speaker in 0..10 {
            presets.push(format!("v2/{lang}_speaker_{speaker}"));
        }
    }
    presets.sort();
    presets
}

/// Speaker tag forced in front of the synthesized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerTag {
    Man,
    Woman,
    Narrator,
}

impl SpeakerTag {
    /// Returns the label shown in the host's dropdown.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerTag::Man => "Man",
            SpeakerTag::Woman => "Woman",
            SpeakerTag::Narrator => "Narrator",
        }
    }

    /// Returns the uppercased form used when prefixing text.
    pub fn prefix(&self) -> &'static str {
        match self {
            SpeakerTag::Man => "MAN",
            SpeakerTag::Woman => "WOMAN",
            SpeakerTag::Narrator => "NARRATOR",
        }
    }
}

/// Runtime settings for the extension.
///
/// The host reads and writes these through [`SettingsStore`]; the pipeline
/// only ever receives an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsSettings {
    pub activate: bool,
    pub autoplay: bool,
    pub show_text: bool,
    pub forced_speaker: Option<SpeakerTag>,
    pub modifiers: Vec<String>,
    pub use_small_models: bool,
    pub use_cpu: bool,
    pub force_manual_download: bool,
    pub voice: String,
    pub sample_rate: u32,
    pub temperature: f32,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            activate: true,
            autoplay: false,
            show_text: false,
            forced_speaker: None,
            modifiers: Vec::new(),
            use_small_models: false,
            use_cpu: false,
            force_manual_download: false,
            voice: DEFAULT_VOICE.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            temperature: 0.7,
        }
    }
}

impl TtsSettings {
    /// Defaults with the `USE_SMALL_MODELS` and `USE_CPU` toggles applied.
    pub fn from_env() -> Self {
        Self {
            use_small_models: flag_from(env::var(USE_SMALL_MODELS_VAR).ok().as_deref()),
            use_cpu: flag_from(env::var(USE_CPU_VAR).ok().as_deref()),
            ..Self::default()
        }
    }

    /// Restore settings from a host-persisted JSON blob.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize settings for host persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn flag_from(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Owns the single mutable copy of the settings.
///
/// The host UI binds its controls to the setters; everything downstream of
/// the store works on [`SettingsStore::snapshot`] clones.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: TtsSettings,
}

impl SettingsStore {
    pub fn new(settings: TtsSettings) -> Self {
        Self { settings }
    }

    /// Store seeded from the process environment.
    pub fn from_env() -> Self {
        Self::new(TtsSettings::from_env())
    }

    /// Current settings, read-only.
    pub fn get(&self) -> &TtsSettings {
        &self.settings
    }

    /// Immutable copy for one pipeline invocation.
    pub fn snapshot(&self) -> TtsSettings {
        self.settings.clone()
    }

    pub fn set_activate(&mut self, on: bool) {
        self.settings.activate = on;
    }

    pub fn set_autoplay(&mut self, on: bool) {
        self.settings.autoplay = on;
    }

    pub fn set_show_text(&mut self, on: bool) {
        self.settings.show_text = on;
    }

    pub fn set_forced_speaker(&mut self, tag: Option<SpeakerTag>) {
        self.settings.forced_speaker = tag;
    }

    pub fn set_modifiers(&mut self, modifiers: Vec<String>) {
        self.settings.modifiers = modifiers;
    }

    pub fn set_force_manual_download(&mut self, on: bool) {
        self.settings.force_manual_download = on;
    }

    pub fn set_voice(&mut self, voice: impl Into<String>) {
        self.settings.voice = voice.into();
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.settings.sample_rate = sample_rate;
    }

    /// Sampling temperature, clamped to the supported 0.1..=1.0 range.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.settings.temperature = temperature.clamp(0.1, 1.0);
    }

    /// Replace the settings wholesale from a host-supplied JSON blob.
    pub fn apply_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.settings = TtsSettings::from_json(json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_from_accepts_true_case_insensitive() {
        assert!(flag_from(Some("true")));
        assert!(flag_from(Some("TRUE")));
        assert!(flag_from(Some("True")));
    }

    #[test]
    fn test_flag_from_rejects_everything_else() {
        assert!(!flag_from(Some("false")));
        assert!(!flag_from(Some("1")));
        assert!(!flag_from(Some("")));
        assert!(!flag_from(None));
    }

    #[test]
    fn test_settings_json_round_trip() {
        let mut settings = TtsSettings::default();
        settings.forced_speaker = Some(SpeakerTag::Narrator);
        settings.modifiers = vec!["[laughter]".to_string()];

        let json = settings.to_json().unwrap();
        let restored = TtsSettings::from_json(&json).unwrap();

        assert_eq!(restored, settings);
    }
}
