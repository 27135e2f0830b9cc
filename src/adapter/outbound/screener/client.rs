//! screener.in HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{Client as HttpClient, StatusCode};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::parse::parse_company;
use crate::domain::{CompanyData, ScrapeMetadata};
use crate::error::{Error, Result};
use crate::infrastructure::config::scraper::ScraperConfig;
use crate::port::outbound::company::CompanySource;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Outcome of fetching one candidate URL.
enum Fetch {
    Page(String),
    /// Try the next candidate.
    Skip(String),
}

/// Fetches and parses company pages.
pub struct ScreenerClient {
    http: HttpClient,
    base_url: String,
    retry_max_attempts: u32,
    backoff_ms: u64,
    retry_statuses: Vec<u16>,
}

impl ScreenerClient {
    #[must_use]
    pub fn from_config(config: &ScraperConfig) -> Self {
        let http = HttpClient::builder()
            .default_headers(browser_headers())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_max_attempts: config.retry_max_attempts,
            backoff_ms: config.backoff_ms,
            retry_statuses: config.retry_statuses.clone(),
        }
    }

    /// Company page URLs to try, in order, without duplicates.
    #[must_use]
    pub fn candidate_urls(&self, symbol: &str) -> Vec<String> {
        let upper = symbol.to_uppercase();
        let mut urls: Vec<String> = Vec::with_capacity(4);
        for sym in [symbol, upper.as_str()] {
            for url in [
                format!("{}/company/{sym}/consolidated/", self.base_url),
                format!("{}/company/{sym}/", self.base_url),
            ] {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
        urls
    }

    fn is_retryable(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    /// Delay before retry number `attempt` (1-based): `backoff * 2^(attempt-1)`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }

    async fn fetch_url(&self, url: &str) -> Result<Fetch> {
        let max_attempts = self.retry_max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(url, attempt, "Fetching company page");

            match self.http.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(Fetch::Page(response.text().await?));
                }
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return Ok(Fetch::Skip("page not found".into()));
                }
                Ok(response) if self.is_retryable(response.status()) && attempt < max_attempts => {
                    warn!(
                        url,
                        status = %response.status(),
                        attempt,
                        max_attempts,
                        "Retryable status, backing off"
                    );
                }
                Ok(response) => {
                    return Ok(Fetch::Skip(format!("HTTP {}", response.status())));
                }
                Err(err) if (err.is_timeout() || err.is_connect()) && attempt < max_attempts => {
                    warn!(url, error = %err, attempt, max_attempts, "Request failed, backing off");
                }
                Err(err) => return Ok(Fetch::Skip(err.to_string())),
            }

            let delay = self.backoff_delay(attempt);
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

#[async_trait]
impl CompanySource for ScreenerClient {
    fn name(&self) -> &'static str {
        "screener"
    }

    async fn fetch(&self, symbol: &str) -> Result<CompanyData> {
        let mut last_reason = String::from("no candidate URLs");

        for url in self.candidate_urls(symbol) {
            match self.fetch_url(&url).await? {
                Fetch::Page(html) => {
                    let mut data = parse_company(&html, symbol, &self.base_url);
                    data.metadata = Some(ScrapeMetadata {
                        ticker: symbol.to_string(),
                        url: url.clone(),
                        scraped_at: Utc::now().timestamp(),
                    });
                    info!(
                        symbol,
                        url = %url,
                        company = %data.company_name,
                        ratios = data.ratios.len(),
                        pl_rows = data.profit_loss.len(),
                        "Parsed company page"
                    );
                    return Ok(data);
                }
                Fetch::Skip(reason) => {
                    warn!(symbol, url = %url, reason = %reason, "Candidate URL failed");
                    last_reason = reason;
                }
            }
        }

        Err(Error::Scrape {
            ticker: symbol.to_string(),
            reason: format!("all URL patterns failed (last: {last_reason})"),
        })
    }
}
