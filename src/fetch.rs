//! Archive retrieval over HTTP.
//!
//! [`ArchiveFetcher`] downloads an archive into memory with a browser-like
//! `User-Agent` (some origins reject empty or library defaults).
//!
//! Retry strategy:
//! - 2xx → read the body
//! - 401, 403, 404 → fail immediately
//! - any other status, a transport error or a timeout → retry
//!
//! Attempt `n` (from 2) is preceded by a sleep of `backoff_ms × (n − 1)`.
//! A successful body shorter than `min_archive_bytes` is an error page in
//! disguise and fails with [`ReaderError::ArchiveTooSmall`].

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::{ReaderError, Result};

/// Reusable HTTP client for archive downloads.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: reqwest::Client,
    max_attempts: u32,
    backoff: Duration,
    min_archive_bytes: usize,
}

enum Attempt {
    Done(Vec<u8>),
    Retry(String),
    Fatal(String),
}

fn is_permanent(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    )
}

impl ArchiveFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReaderError::FetchFailed {
                url: String::new(),
                attempts: 0,
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
            min_archive_bytes: config.min_archive_bytes,
        })
    }

    /// Download `url`, retrying transient failures.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = Url::parse(url).map_err(|e| ReaderError::FetchFailed {
            url: url.to_string(),
            attempts: 0,
            reason: format!("invalid URL: {}", e),
        })?;

        let mut last_err = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                // Linear backoff.
                tokio::time::sleep(self.backoff * (attempt - 1)).await;
            }

            debug!(url = %parsed, attempt, max = self.max_attempts, "Fetching archive");

            match self.attempt(&parsed).await {
                Attempt::Done(bytes) => {
                    if bytes.len() < self.min_archive_bytes {
                        return Err(ReaderError::ArchiveTooSmall {
                            size: bytes.len(),
                            minimum: self.min_archive_bytes,
                        });
                    }
                    info!(url = %parsed, bytes = bytes.len(), attempt, "Fetched archive");
                    return Ok(bytes);
                }
                Attempt::Fatal(reason) => {
                    return Err(ReaderError::FetchFailed {
                        url: url.to_string(),
                        attempts: attempt,
                        reason,
                    });
                }
                Attempt::Retry(reason) => {
                    warn!(url = %parsed, attempt, reason = %reason, "Archive fetch failed");
                    last_err = Some(reason);
                }
            }
        }

        Err(ReaderError::FetchFailed {
            url: url.to_string(),
            attempts: self.max_attempts,
            reason: last_err.unwrap_or_else(|| "fetch failed after retries".to_string()),
        })
    }

    /// [`fetch`](Self::fetch) bounded by an overall deadline covering every
    /// attempt and backoff.
    pub async fn fetch_with_deadline(&self, url: &str, deadline: Duration) -> Result<Vec<u8>> {
        match tokio::time::timeout(deadline, self.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(ReaderError::FetchFailed {
                url: url.to_string(),
                attempts: 0,
                reason: format!("deadline of {:?} exceeded", deadline),
            }),
        }
    }

    async fn attempt(&self, url: &Url) -> Attempt {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(e.to_string()),
        };

        let status = response.status();
        if status.is_success() {
            return match response.bytes().await {
                Ok(body) => Attempt::Done(body.to_vec()),
                Err(e) => Attempt::Retry(format!("failed to read body: {}", e)),
            };
        }

        if is_permanent(status) {
            Attempt::Fatal(format!("HTTP {}", status))
        } else {
            Attempt::Retry(format!("HTTP {}", status))
        }
    }
}
