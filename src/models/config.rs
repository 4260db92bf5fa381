// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Candidate extraction settings
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Poll loop behavior
    #[serde(default)]
    pub watch: WatchConfig,

    /// Publishing and rate limiting
    #[serde(default)]
    pub publish: PublishConfig,

    /// Persisted state locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(AppError::validation("source.url is empty"));
        }
        if Url::parse(&self.source.url).is_err() {
            return Err(AppError::validation(format!(
                "source.url is not a valid URL: {}",
                self.source.url
            )));
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.extract.strategy == Strategy::Markup && self.extract.selector.trim().is_empty() {
            return Err(AppError::validation(
                "extract.selector is empty (required by the markup strategy)",
            ));
        }
        if self.extract.min_words == 0 {
            return Err(AppError::validation("extract.min_words must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.extract.uppercase_threshold) {
            return Err(AppError::validation(
                "extract.uppercase_threshold must be within 0.0..=1.0",
            ));
        }
        if self.watch.poll_interval_ms == 0 {
            return Err(AppError::validation("watch.poll_interval_ms must be > 0"));
        }
        if self.watch.max_attach_attempts == 0 {
            return Err(AppError::validation(
                "watch.max_attach_attempts must be > 0",
            ));
        }
        if !self.publish.webhook_url.is_empty() && Url::parse(&self.publish.webhook_url).is_err() {
            return Err(AppError::validation(format!(
                "publish.webhook_url is not a valid URL: {}",
                self.publish.webhook_url
            )));
        }
        if self.publish.max_attempts == 0 {
            return Err(AppError::validation("publish.max_attempts must be > 0"));
        }
        if self.publish.window_secs == 0 {
            return Err(AppError::validation("publish.window_secs must be > 0"));
        }
        Ok(())
    }
}

/// Snapshot source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the monitored page
    #[serde(default)]
    pub url: String,

    /// Require the page `<title>` to contain this fragment when attaching
    #[serde(default)]
    pub title_contains: Option<String>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            title_contains: None,
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Extraction strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// CSS-selector extraction from HTML markup
    Markup,
    /// Timestamp-delimited segmentation of plain text
    Segments,
    /// Timestamp segmentation plus the uppercase heading filter
    Heading,
}

/// Policy when a timestamp strategy finds no timestamps in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Yield no candidates
    Empty,
    /// Yield the whole trimmed snapshot as one candidate
    WholeText,
}

/// Candidate extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Which extraction heuristic to run
    #[serde(default = "defaults::strategy")]
    pub strategy: Strategy,

    /// CSS selector for the markup strategy
    #[serde(default = "defaults::selector")]
    pub selector: String,

    /// Minimum word count for timestamp-delimited candidates
    #[serde(default = "defaults::min_words")]
    pub min_words: usize,

    /// Fraction of alphabetic words that must be fully upper-case
    #[serde(default = "defaults::uppercase_threshold")]
    pub uppercase_threshold: f64,

    /// What to yield when no timestamps are found
    #[serde(default = "defaults::no_timestamp_fallback")]
    pub no_timestamp_fallback: FallbackPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strategy: defaults::strategy(),
            selector: defaults::selector(),
            min_words: defaults::min_words(),
            uppercase_threshold: defaults::uppercase_threshold(),
            no_timestamp_fallback: defaults::no_timestamp_fallback(),
        }
    }
}

/// Poll loop behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Delay between poll cycles in milliseconds
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    /// Backoff after a source error in milliseconds
    #[serde(default = "defaults::backoff")]
    pub backoff_ms: u64,

    /// Consecutive attach failures tolerated before terminating
    #[serde(default = "defaults::max_attach_attempts")]
    pub max_attach_attempts: u32,

    /// Quiet period before the aggregation buffer flushes, in seconds
    #[serde(default = "defaults::quiet_period")]
    pub quiet_period_secs: u64,

    /// Ring the terminal bell when new items are confirmed
    #[serde(default = "defaults::bell")]
    pub bell: bool,
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_secs(self.quiet_period_secs)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::poll_interval(),
            backoff_ms: defaults::backoff(),
            max_attach_attempts: defaults::max_attach_attempts(),
            quiet_period_secs: defaults::quiet_period(),
            bell: defaults::bell(),
        }
    }
}

/// Publishing and rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Webhook to POST payloads to; empty means print to stdout
    #[serde(default)]
    pub webhook_url: String,

    /// Maximum publish attempts within the rolling window
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: usize,

    /// Rolling window length in seconds
    #[serde(default = "defaults::window")]
    pub window_secs: u64,
}

impl PublishConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            max_attempts: defaults::max_attempts(),
            window_secs: defaults::window(),
        }
    }
}

/// Persisted state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Append-only emission log (CSV)
    #[serde(default = "defaults::emission_log")]
    pub emission_log: PathBuf,

    /// Publish-attempt ledger (JSON)
    #[serde(default = "defaults::usage_ledger")]
    pub usage_ledger: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            emission_log: defaults::emission_log(),
            usage_ledger: defaults::usage_ledger(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::{FallbackPolicy, Strategy};

    // Source defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; feedwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Extraction defaults
    pub fn strategy() -> Strategy {
        Strategy::Heading
    }
    pub fn selector() -> String {
        "a.newsTitleLink".into()
    }
    pub fn min_words() -> usize {
        3
    }
    pub fn uppercase_threshold() -> f64 {
        0.75
    }
    pub fn no_timestamp_fallback() -> FallbackPolicy {
        FallbackPolicy::Empty
    }

    // Watch defaults
    pub fn poll_interval() -> u64 {
        3000
    }
    pub fn backoff() -> u64 {
        5000
    }
    pub fn max_attach_attempts() -> u32 {
        5
    }
    pub fn quiet_period() -> u64 {
        5
    }
    pub fn bell() -> bool {
        true
    }

    // Publish defaults
    pub fn max_attempts() -> usize {
        100
    }
    pub fn window() -> u64 {
        86_400
    }

    // Path defaults
    pub fn emission_log() -> PathBuf {
        PathBuf::from("headlines.csv")
    }
    pub fn usage_ledger() -> PathBuf {
        PathBuf::from("usage.json")
    }
}
