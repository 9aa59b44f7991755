//! Extension settings: defaults, environment seeding, and the owned store.
//!
//! The original UI mutated one process-wide options map from its widget
//! callbacks. Here a single [`SettingsStore`] owns the mutable copy and the
//! pipeline receives immutable snapshots, so a future concurrent host
//! cannot race the synthesis loop.

mod settings;

pub use settings::{
    DEFAULT_SAMPLE_RATE, DEFAULT_VOICE, MODIFIER_OPTIONS, SettingsStore, SpeakerTag, TtsSettings,
    USE_CPU_VAR, USE_SMALL_MODELS_VAR, voice_presets,
};
