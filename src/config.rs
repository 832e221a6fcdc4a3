//! Configuration parsing and validation.
//!
//! Aozora Reader is configured via a TOML file. Every section and every key
//! is optional; an empty file yields [`Config::default()`].
//!
//! # Example Configuration
//!
//! ```toml
//! [fetch]
//! user_agent = "Mozilla/5.0 (compatible; AozoraReader/1.0)"
//! timeout_secs = 30
//! max_attempts = 3
//! backoff_ms = 1000
//! min_archive_bytes = 100
//! deadline_secs = 120       # whole fetch, every attempt included
//!
//! [extract]
//! text_extension = ".txt"
//! max_entry_bytes = 52428800
//!
//! [decode]
//! encoding = "auto"          # "auto", "shift-jis" or "utf-8"
//!
//! [reading]
//! lines_per_page = 30
//! search_context_chars = 20
//!
//! [summary]
//! max_chars = 15000
//! truncation_marker = "（以下省略）"
//!
//! [catalog]
//! cache_ttl_secs = 86400
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::decode::EncodingPreference;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff step: attempt `n` waits `backoff_ms × (n − 1)`.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Bodies shorter than this are treated as error pages.
    #[serde(default = "default_min_archive_bytes")]
    pub min_archive_bytes: usize,
    /// Overall bound on one fetch, retries and backoff included.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            min_archive_bytes: default_min_archive_bytes(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; AozoraReader/1.0)".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_ms() -> u64 {
    1000
}
fn default_min_archive_bytes() -> usize {
    100
}
fn default_deadline_secs() -> u64 {
    120
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractConfig {
    #[serde(default = "default_text_extension")]
    pub text_extension: String,
    /// Decompressed size limit for the selected entry.
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            text_extension: default_text_extension(),
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

fn default_text_extension() -> String {
    ".txt".to_string()
}
fn default_max_entry_bytes() -> u64 {
    50 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DecodeConfig {
    #[serde(default)]
    pub encoding: EncodingPreference,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReadingConfig {
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
    #[serde(default = "default_search_context_chars")]
    pub search_context_chars: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            lines_per_page: default_lines_per_page(),
            search_context_chars: default_search_context_chars(),
        }
    }
}

fn default_lines_per_page() -> usize {
    30
}
fn default_search_context_chars() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummaryConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_truncation_marker")]
    pub truncation_marker: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            truncation_marker: default_truncation_marker(),
        }
    }
}

fn default_max_chars() -> usize {
    15_000
}
fn default_truncation_marker() -> String {
    "（以下省略）".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from a TOML string without touching the filesystem.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

fn validate(config: &Config) -> Result<()> {
    if config.fetch.max_attempts == 0 {
        anyhow::bail!("fetch.max_attempts must be >= 1");
    }
    if config.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be >= 1");
    }
    if config.fetch.deadline_secs == 0 {
        anyhow::bail!("fetch.deadline_secs must be >= 1");
    }
    if config.fetch.user_agent.trim().is_empty() {
        anyhow::bail!("fetch.user_agent must not be empty");
    }
    if config.extract.text_extension.is_empty() {
        anyhow::bail!("extract.text_extension must not be empty");
    }
    if config.reading.lines_per_page == 0 {
        anyhow::bail!("reading.lines_per_page must be >= 1");
    }
    if config.summary.max_chars == 0 {
        anyhow::bail!("summary.max_chars must be >= 1");
    }
    Ok(())
}
