//! Batch scraping into the company archive.
//!
//! Symbols are scraped one after another. The pause between symbols grows
//! with the number of failures so far, which backs off from a site that has
//! started refusing requests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::sleep;
use tracing::{error, info};

use crate::domain::is_valid_symbol;
use crate::error::{Error, Result};
use crate::port::outbound::company::{CompanySource, CompanyStore};

/// Pacing between symbols of a batch.
#[derive(Debug, Clone, Copy)]
pub struct ScrapePacing {
    pub delay: Duration,
    pub failure_step: Duration,
    pub max_delay: Duration,
}

impl ScrapePacing {
    /// No pauses at all.
    pub const NONE: Self = Self {
        delay: Duration::ZERO,
        failure_step: Duration::ZERO,
        max_delay: Duration::ZERO,
    };

    /// `min(delay + failures * failure_step, max_delay)`.
    #[must_use]
    pub fn delay_after(&self, failures: u32) -> Duration {
        self.delay
            .saturating_add(self.failure_step.saturating_mul(failures))
            .min(self.max_delay)
    }
}

/// A symbol saved to the archive.
#[derive(Debug, Clone, Serialize)]
pub struct Scraped {
    pub symbol: String,
    pub company: String,
    pub path: PathBuf,
}

/// A symbol that could not be scraped.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeSummary {
    pub succeeded: Vec<Scraped>,
    pub failed: Vec<ScrapeFailure>,
}

/// Scrapes company records and archives the usable ones.
pub struct ScrapeService {
    source: Arc<dyn CompanySource>,
    store: Arc<dyn CompanyStore>,
    pacing: ScrapePacing,
}

impl ScrapeService {
    pub fn new(
        source: Arc<dyn CompanySource>,
        store: Arc<dyn CompanyStore>,
        pacing: ScrapePacing,
    ) -> Self {
        Self {
            source,
            store,
            pacing,
        }
    }

    /// Scrape, validate and save one symbol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scrape`] when the symbol is malformed, the page
    /// cannot be fetched or the parsed record is not usable, or an I/O error if saving fails.
    pub async fn scrape_one(&self, symbol: &str) -> Result<Scraped> {
        let symbol = bare_symbol(symbol);
        if !is_valid_symbol(&symbol) {
            return Err(Error::Scrape {
                ticker: symbol,
                reason: "not a valid exchange symbol".into(),
            });
        }
        let data = self.source.fetch(&symbol).await?;
        if !data.is_usable() {
            return Err(Error::Scrape {
                ticker: symbol,
                reason: "page parsed but no usable data".into(),
            });
        }
        let path = self.store.save(&symbol, &data)?;
        info!(
            symbol = %symbol,
            path = %path.display(),
            source = self.source.name(),
            "Saved company data"
        );
        Ok(Scraped {
            symbol,
            company: data.company_name,
            path,
        })
    }

    /// Scrape every symbol in order. Failures are collected, never fatal.
    pub async fn scrape_and_save(&self, symbols: &[String]) -> ScrapeSummary {
        let mut summary = ScrapeSummary::default();
        let mut failures: u32 = 0;

        for (i, symbol) in symbols.iter().enumerate() {
            info!(symbol = %symbol, progress = i + 1, total = symbols.len(), "Scraping");

            match self.scrape_one(symbol).await {
                Ok(scraped) => summary.succeeded.push(scraped),
                Err(err) => {
                    error!(symbol = %symbol, error = %err, "Scrape failed");
                    failures += 1;
                    summary.failed.push(ScrapeFailure {
                        symbol: bare_symbol(symbol),
                        reason: err.to_string(),
                    });
                }
            }

            if i + 1 < symbols.len() {
                let delay = self.pacing.delay_after(failures);
                if !delay.is_zero() {
                    info!(delay_ms = delay.as_millis() as u64, "Waiting before next request");
                    sleep(delay).await;
                }
            }
        }

        info!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Scraping completed"
        );
        summary
    }
}

/// Upper-cased symbol without any exchange suffix (`tcs.ns` -> `TCS`).
#[must_use]
pub fn bare_symbol(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.rsplit_once('.') {
        Some((symbol, suffix)) if !symbol.is_empty() && is_exchange_code(suffix) => {
            symbol.to_string()
        }
        _ => upper,
    }
}

fn is_exchange_code(suffix: &str) -> bool {
    suffix.len() == 2 && suffix.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::archive::JsonCompanyStore;
    use crate::adapter::outbound::screener::mock::tests::MockSource;
    use crate::domain::{CompanyData, Ratio};

    fn usable(name: &str) -> CompanyData {
        CompanyData {
            company_name: name.into(),
            ratios: vec![Ratio {
                name: "ROE".into(),
                value: None,
            }],
            ..CompanyData::default()
        }
    }

    fn service(source: MockSource) -> (tempfile::TempDir, Arc<MockSource>, ScrapeService) {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(source);
        let svc = ScrapeService::new(
            source.clone(),
            Arc::new(JsonCompanyStore::new(dir.path())),
            ScrapePacing::NONE,
        );
        (dir, source, svc)
    }

    #[test]
    fn pacing_grows_with_failures_and_caps() {
        let pacing = ScrapePacing {
            delay: Duration::from_millis(2_000),
            failure_step: Duration::from_millis(500),
            max_delay: Duration::from_millis(3_000),
        };
        assert_eq!(pacing.delay_after(0), Duration::from_millis(2_000));
        assert_eq!(pacing.delay_after(1), Duration::from_millis(2_500));
        assert_eq!(pacing.delay_after(10), Duration::from_millis(3_000));
    }

    #[test]
    fn bare_symbol_strips_exchange_suffix() {
        assert_eq!(bare_symbol("tcs.ns"), "TCS");
        assert_eq!(bare_symbol("SBIN.BO"), "SBIN");
        assert_eq!(bare_symbol("M&M"), "M&M");
        assert_eq!(bare_symbol(" reliance "), "RELIANCE");
    }

    #[tokio::test]
    async fn batch_collects_successes_and_failures() {
        let (dir, source, svc) = service(MockSource::new().with("TCS", usable("TCS Ltd")));

        let summary = svc
            .scrape_and_save(&["TCS.NS".to_string(), "NOPE".to_string()])
            .await;

        assert_eq!(summary.succeeded.len(), 1);
        assert_eq!(summary.succeeded[0].symbol, "TCS");
        assert!(dir.path().join("TCS.json").exists());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].symbol, "NOPE");
        assert_eq!(source.calls(), vec!["TCS", "NOPE"]);
    }

    #[tokio::test]
    async fn unusable_record_is_not_saved() {
        let empty = CompanyData {
            company_name: "Empty Co".into(),
            ..CompanyData::default()
        };
        let (dir, _source, svc) = service(MockSource::new().with("EMPTY", empty));

        let err = svc.scrape_one("EMPTY").await.unwrap_err();

        assert!(matches!(err, Error::Scrape { .. }));
        assert!(!dir.path().join("EMPTY.json").exists());
    }

    #[tokio::test]
    async fn path_like_symbol_is_rejected_before_fetching() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("scraped_data");
        let source = Arc::new(MockSource::new().with("../OUTSIDE", usable("Outside Ltd")));
        let svc = ScrapeService::new(
            source.clone(),
            Arc::new(JsonCompanyStore::new(&data_dir)),
            ScrapePacing::NONE,
        );

        let err = svc.scrape_one("../outside").await.unwrap_err();

        assert!(matches!(err, Error::Scrape { .. }));
        assert!(source.calls().is_empty());
        assert!(!root.path().join("OUTSIDE.json").exists());
        assert!(!data_dir.exists());
    }

    fn paced(source: MockSource) -> (tempfile::TempDir, ScrapeService) {
        let dir = tempfile::tempdir().unwrap();
        let svc = ScrapeService::new(
            Arc::new(source),
            Arc::new(JsonCompanyStore::new(dir.path())),
            ScrapePacing {
                delay: Duration::from_millis(2_000),
                failure_step: Duration::from_millis(500),
                max_delay: Duration::from_millis(3_000),
            },
        );
        (dir, svc)
    }

    #[tokio::test(start_paused = true)]
    async fn batch_pauses_between_symbols_but_not_after_the_last() {
        let source = MockSource::new()
            .with("TCS", usable("TCS Ltd"))
            .with("INFY", usable("Infosys Ltd"));
        let (_dir, svc) = paced(source);

        let start = tokio::time::Instant::now();
        svc.scrape_and_save(&["TCS".to_string()]).await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        let start = tokio::time::Instant::now();
        let summary = svc
            .scrape_and_save(&["TCS".to_string(), "INFY".to_string()])
            .await;
        assert_eq!(summary.succeeded.len(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(2_000));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_lengthen_the_pause() {
        let (_dir, svc) = paced(MockSource::new().with("INFY", usable("Infosys Ltd")));

        let start = tokio::time::Instant::now();
        let summary = svc
            .scrape_and_save(&["NOPE".to_string(), "INFY".to_string()])
            .await;

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(start.elapsed(), Duration::from_millis(2_500));
    }
}
