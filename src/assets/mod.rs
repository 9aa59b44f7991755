//! Model weight provisioning.
//!
//! Ensures the six Bark weight files exist in a local cache before the
//! first synthesis call. The primary path delegates to the runtime's own
//! preload routine; when its internal download mechanism fails, the
//! provisioner falls back to fetching each weight file directly from the
//! published v0 layout.

mod fetcher;
mod provisioner;

pub use fetcher::{FetchError, HttpFetcher};
pub use provisioner::{DEFAULT_MAX_ATTEMPTS, ProvisionError, Provisioner};

use std::path::{Path, PathBuf};

/// Weight files required before synthesis can start.
pub const MODEL_ASSETS: [&str; 6] = ["text", "coarse", "fine", "text_2", "coarse_2", "fine_2"];

/// Remote layout of the published v0 weights.
const REMOTE_BASE: &str = "https://dl.suno-models.io/bark/models/v0";

/// Environment variable overriding the weight cache root.
pub const MODEL_PATH_VAR: &str = "MODEL_PATH";

/// Canonical download URL for a named weight file.
pub fn asset_url(name: &str) -> String {
    format!("{REMOTE_BASE}/{name}.pt")
}

/// Content-addressed cache location: the md5 hex digest of the download URL.
pub fn asset_path(cache_dir: &Path, name: &str) -> PathBuf {
    let digest = md5::compute(asset_url(name).as_bytes());
    cache_dir.join(format!("{digest:x}.pt"))
}

/// Weight cache root: `MODEL_PATH` if set, the user cache directory otherwise.
pub fn default_cache_dir() -> PathBuf {
    if let Ok(path) = std::env::var(MODEL_PATH_VAR) {
        return PathBuf::from(path);
    }

    dirs::cache_dir()
        .expect("Could not find cache directory")
        .join("bark-tts")
        .join("models")
}

/// Trait for the HTTP layer used by the manual download path.
///
/// This abstracts the network access, allowing for mock implementations
/// in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    /// Fetch a URL and return the complete response body.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
