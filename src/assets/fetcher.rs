//! Blocking HTTP fetcher for weight downloads.

use std::io::Read;

use thiserror::Error;
use tracing::warn;

use super::Fetcher;

/// Browser User-Agent sent with weight downloads; the remote host rejects
/// default client agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/112.0";

/// Errors raised while fetching a remote asset.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The connection dropped mid-body; `partial` holds the bytes that
    /// arrived before the drop.
    #[error("truncated response body: received {} of {expected:?} bytes", partial.len())]
    Truncated {
        partial: Vec<u8>,
        expected: Option<u64>,
    },
}

/// Fetcher backed by a blocking reqwest client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let expected = response.content_length();
        let mut body = Vec::new();

        if let Err(e) = response.read_to_end(&mut body) {
            warn!("body read interrupted after {} bytes: {e}", body.len());
            return Err(FetchError::Truncated {
                partial: body,
                expected,
            });
        }

        if let Some(expected_len) = expected
            && (body.len() as u64) < expected_len
        {
            return Err(FetchError::Truncated {
                partial: body,
                expected,
            });
        }

        Ok(body)
    }
}
