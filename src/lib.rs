//! bark-tts: Bark text-to-speech for chat UI hosts.
//!
//! This crate intercepts generated chat text, synthesizes speech through an
//! injected Bark runtime, writes a WAV artifact, and hands the host an
//! embeddable audio tag. Model weights are provisioned once at startup,
//! with a direct-download fallback for when the runtime's own download
//! mechanism fails.

pub mod assets;
pub mod cli;
pub mod config;
pub mod host;
pub mod model;
pub mod pipeline;
