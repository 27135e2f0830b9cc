//! Fundamentals scraper configuration.

use serde::{Deserialize, Serialize};

/// Settings for scraping company pages from screener.in.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// Site base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Attempts per URL, including the first.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Base of the exponential backoff between attempts, in milliseconds.
    /// Attempt `n` waits `backoff_ms * 2^(n-1)`.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// HTTP statuses that trigger a retry.
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Pause between tickers in a batch, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Extra pause per failed ticker so far, in milliseconds.
    #[serde(default = "default_failure_delay_step_ms")]
    pub failure_delay_step_ms: u64,

    /// Upper bound of the pause between tickers, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            backoff_ms: default_backoff_ms(),
            retry_statuses: default_retry_statuses(),
            delay_ms: default_delay_ms(),
            failure_delay_step_ms: default_failure_delay_step_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.screener.in".into()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_retry_max_attempts() -> u32 {
    3
}

const fn default_backoff_ms() -> u64 {
    2_000
}

fn default_retry_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504, 520, 521, 522, 523, 524]
}

const fn default_delay_ms() -> u64 {
    2_000
}

const fn default_failure_delay_step_ms() -> u64 {
    500
}

const fn default_max_delay_ms() -> u64 {
    10_000
}
