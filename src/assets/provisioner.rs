//! Weight provisioning: primary preload path with manual download fallback.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::TtsSettings;
use crate::model::{BarkModel, ModelError, PreloadOptions};

use super::{FetchError, Fetcher, MODEL_ASSETS, asset_path, asset_url};

/// Download attempts per weight file before giving up (or salvaging).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Errors that can occur during provisioning.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("failed to fetch {name} weights")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ensures the Bark weight files are present in the cache and loaded into
/// the runtime before the first synthesis call.
pub struct Provisioner<F: Fetcher> {
    fetcher: F,
    cache_dir: PathBuf,
    max_attempts: u32,
    accept_partial: bool,
}

impl<F: Fetcher> Provisioner<F> {
    pub fn new(fetcher: F, cache_dir: PathBuf) -> Self {
        Self {
            fetcher,
            cache_dir,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            accept_partial: false,
        }
    }

    /// Set the number of download attempts per weight file.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Keep a truncated body once retries are exhausted instead of failing.
    /// Off by default; the written file may be unusable.
    pub fn with_accept_partial(mut self, accept: bool) -> Self {
        self.accept_partial = accept;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Ensure all weights are present and loaded into the runtime.
    ///
    /// The runtime's preload downloads and loads in one step. When its
    /// download mechanism reports failure, or the settings force it, each
    /// weight file is fetched directly and preload runs again to pick up
    /// the now-cached files. Any other preload error is fatal.
    pub fn provision<M: BarkModel>(
        &self,
        model: &M,
        settings: &TtsSettings,
    ) -> Result<(), ProvisionError> {
        let options = PreloadOptions::from_settings(settings);

        if settings.force_manual_download {
            info!("manual weight download forced");
        } else {
            match model.preload(&options) {
                Ok(()) => return Ok(()),
                Err(ModelError::AutoDownload(reason)) => {
                    warn!("automatic model download failed ({reason}), fetching weights directly");
                }
                Err(other) => return Err(other.into()),
            }
        }

        self.ensure_assets()?;
        model.preload(&options)?;
        Ok(())
    }

    /// Download every missing weight file into the cache.
    pub fn ensure_assets(&self) -> Result<(), ProvisionError> {
        fs::create_dir_all(&self.cache_dir)?;
        for name in MODEL_ASSETS {
            self.ensure_asset(name)?;
        }
        Ok(())
    }

    fn ensure_asset(&self, name: &str) -> Result<(), ProvisionError> {
        let path = asset_path(&self.cache_dir, name);
        if path.exists() {
            info!("{name} model already cached, skipping");
            return Ok(());
        }

        let url = asset_url(name);
        info!("downloading {name} model to {}", path.display());

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetcher.fetch(&url) {
                Ok(body) => {
                    fs::write(&path, body)?;
                    return Ok(());
                }
                Err(FetchError::Truncated { partial, expected }) if attempt < self.max_attempts => {
                    warn!(
                        "truncated {name} download, received {} of {expected:?} bytes, \
                         retrying ({attempt}/{})",
                        partial.len(),
                        self.max_attempts
                    );
                }
                Err(FetchError::Truncated { partial, expected }) if self.accept_partial => {
                    warn!(
                        "keeping truncated {name} download after {attempt} attempts, \
                         {} of {expected:?} bytes",
                        partial.len()
                    );
                    fs::write(&path, partial)?;
                    return Ok(());
                }
                Err(source) => {
                    return Err(ProvisionError::Fetch {
                        name: name.to_string(),
                        source,
                    });
                }
            }
        }
    }
}
