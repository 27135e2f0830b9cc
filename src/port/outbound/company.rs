//! Company fundamentals source and archive ports.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::CompanyData;
use crate::error::Result;

/// Fetches a full company record for a bare exchange symbol.
#[async_trait]
pub trait CompanySource: Send + Sync {
    /// Return the source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch and parse the company page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scrape`](crate::error::Error::Scrape) when no page
    /// could be fetched for the symbol, or an HTTP error for transport
    /// failures that outlast the retry budget.
    async fn fetch(&self, symbol: &str) -> Result<CompanyData>;
}

/// Archive of scraped company records, one per symbol.
pub trait CompanyStore: Send + Sync {
    /// Persist a record, keeping a backup of any previous one. Returns the
    /// location written.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    fn save(&self, symbol: &str, data: &CompanyData) -> Result<PathBuf>;

    /// Load every current (non-backup) record as `(symbol, data)`, sorted
    /// by symbol. Unreadable records are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive itself cannot be listed.
    fn load_all(&self) -> Result<Vec<(String, CompanyData)>>;

    /// Digest of the archive contents; changes whenever a record does.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be listed.
    fn fingerprint(&self) -> Result<u64>;
}
