//! Injected asset sources: the local logo and remote Blob Store bytes.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Supplies the organization logo for the header band.
pub trait AssetResolver: Send + Sync {
    fn resolve_logo(&self) -> Option<Vec<u8>>;
}

/// Probes candidate paths in order; the first readable file wins.
pub struct FsLogoResolver {
    candidates: Vec<PathBuf>,
}

impl FsLogoResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }
}

impl AssetResolver for FsLogoResolver {
    fn resolve_logo(&self) -> Option<Vec<u8>> {
        for path in &self.candidates {
            match std::fs::read(path) {
                Ok(bytes) if !bytes.is_empty() => {
                    tracing::debug!(path = %path.display(), "Logo resolved");
                    return Some(bytes);
                }
                Ok(_) => tracing::debug!(path = %path.display(), "Logo candidate is empty"),
                Err(_) => continue,
            }
        }
        tracing::debug!(candidates = self.candidates.len(), "No logo found, using wordmark");
        None
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Remote returned status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Reads bytes from the Blob Store.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP GET against Blob Store URLs.
pub struct HttpBlobFetcher {
    client: reqwest::Client,
}

impl HttpBlobFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpBlobFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Deadline and retry budget applied to every remote fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchPolicy {
    /// Per-attempt deadline.
    pub timeout: Duration,
    /// Total attempts, at least one.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

impl FetchPolicy {
    /// Fetch through `fetcher`, retrying failures. A deadline expiry counts
    /// as a failed attempt. Returns the last error.
    pub async fn fetch(&self, fetcher: &dyn BlobFetcher, url: &str) -> Result<Vec<u8>, FetchError> {
        let attempts = self.max_attempts.max(1);
        let mut last_error = FetchError::Timeout(self.timeout);

        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(self.timeout, fetcher.fetch_bytes(url)).await;
            match outcome {
                Ok(Ok(bytes)) => return Ok(bytes),
                Ok(Err(e)) => last_error = e,
                Err(_) => last_error = FetchError::Timeout(self.timeout),
            }
            tracing::debug!(url, attempt, error = %last_error, "Fetch attempt failed");
            if attempt < attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        tracing::warn!(url, attempts, error = %last_error, "Remote content unavailable");
        Err(last_error)
    }
}
