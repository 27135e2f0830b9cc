//! Yahoo Finance HTTP client.
//!
//! Live prices and fundamentals come from the quoteSummary endpoint; price
//! history comes from the chart endpoint. Requests that fail with a timeout
//! or connection error are retried with a fixed backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::dto::{raw, ChartData, ChartResponse, QuoteSummary, QuoteSummaryResponse};
use crate::domain::{Fundamentals, Price, Quote, Technicals, Ticker};
use crate::error::{Error, Result};
use crate::infrastructure::config::market::MarketDataConfig;
use crate::port::outbound::market::MarketData;

/// Browser-like user agent; Yahoo rejects the default reqwest one.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// quoteSummary modules needed for prices and fundamentals.
const SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

/// HTTP client for the Yahoo Finance query API.
pub struct YahooClient {
    http: HttpClient,
    base_url: String,
    history_range: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl YahooClient {
    /// Create a client against the given base URL with no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            history_range: "1y".into(),
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &MarketDataConfig) -> Self {
        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            history_range: config.history_range.clone(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    async fn get_with_retry<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = self.http.get(url).query(query).send().await;
            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(err) => return Err(Error::Connection(err.to_string())),
            };

            let parsed = response.json::<T>().await;
            match parsed {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Yahoo request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    /// Fetch the quoteSummary modules for a ticker.
    pub async fn summary(&self, ticker: &Ticker) -> Result<QuoteSummary> {
        let url = format!("{}/v10/finance/quoteSummary/{ticker}", self.base_url);
        let response: QuoteSummaryResponse = self
            .get_with_retry(&url, &[("modules", SUMMARY_MODULES)])
            .await?;

        if let Some(err) = response.quote_summary.error {
            return Err(Error::Connection(format!(
                "yahoo quoteSummary {}: {}",
                err.code, err.description
            )));
        }
        Ok(response
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .unwrap_or_default())
    }

    /// Fetch daily chart data over `range`.
    pub async fn chart(&self, ticker: &Ticker, range: &str) -> Result<ChartData> {
        let url = format!("{}/v8/finance/chart/{ticker}", self.base_url);
        let response: ChartResponse = self
            .get_with_retry(&url, &[("range", range), ("interval", "1d")])
            .await?;

        if let Some(err) = response.chart.error {
            return Err(Error::Connection(format!(
                "yahoo chart {}: {}",
                err.code, err.description
            )));
        }
        response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::Connection(format!("yahoo chart: no data for {ticker}")))
    }

    /// Latest price together with its currency.
    pub async fn quote(&self, ticker: &Ticker) -> Result<Quote> {
        let summary = self.summary(ticker).await?;
        let currency = summary.price.as_ref().and_then(|p| p.currency.clone());
        Ok(Quote {
            ticker: ticker.to_string(),
            price: price_from_summary(&summary),
            currency,
        })
    }
}

/// Current price, falling back to the regular-market price.
fn price_from_summary(summary: &QuoteSummary) -> Option<Price> {
    let current = summary
        .financial_data
        .as_ref()
        .and_then(|f| raw(f.current_price));
    let regular = summary
        .price
        .as_ref()
        .and_then(|p| raw(p.regular_market_price));
    current.or(regular).and_then(to_price)
}

fn to_price(value: f64) -> Option<Price> {
    Decimal::try_from(value).ok().map(|d| d.round_dp(2))
}

fn fundamentals_from_summary(summary: QuoteSummary) -> Fundamentals {
    let price = summary.price.unwrap_or_default();
    let profile = summary.summary_profile.unwrap_or_default();
    let detail = summary.summary_detail.unwrap_or_default();
    let stats = summary.default_key_statistics.unwrap_or_default();
    let financial = summary.financial_data.unwrap_or_default();

    Fundamentals {
        name: price.long_name.or(price.short_name),
        sector: profile.sector,
        industry: profile.industry,
        market_cap: raw(price.market_cap).or(raw(detail.market_cap)),
        pe: raw(detail.trailing_pe),
        pb: raw(stats.price_to_book),
        roe: raw(financial.return_on_equity),
        debt_to_equity: raw(financial.debt_to_equity),
        eps: raw(stats.trailing_eps),
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn live_price(&self, ticker: &Ticker) -> Result<Option<Price>> {
        let summary = self.summary(ticker).await?;
        let price = price_from_summary(&summary);
        debug!(ticker = %ticker, price = ?price, "Fetched live price");
        Ok(price)
    }

    async fn fundamentals(&self, ticker: &Ticker) -> Result<Fundamentals> {
        Ok(fundamentals_from_summary(self.summary(ticker).await?))
    }

    async fn technicals(&self, ticker: &Ticker) -> Result<Technicals> {
        let chart = self.chart(ticker, &self.history_range).await?;
        let closes = chart.closes();
        debug!(ticker = %ticker, points = closes.len(), "Fetched price history");
        Ok(Technicals::from_closes(&closes))
    }
}
