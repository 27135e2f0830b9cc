//! Retrieval over the scraped company archive.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::chunk::{build_chunks, Chunk, ChunkKind};
use super::index::FlatIndex;
use crate::error::Result;
use crate::port::outbound::company::CompanyStore;
use crate::port::outbound::embedding::Embedder;

/// Returned by [`KnowledgeBase::context`] when nothing has been indexed.
pub const NO_DATA: &str = "No data available. Please ensure data scraping has been completed.";

/// A retrieved chunk and its distance to the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub chunk: Chunk,
    /// Squared L2 distance; lower is closer.
    pub score: f32,
}

/// Index statistics.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
    pub total_chunks: usize,
    pub total_companies: usize,
    pub companies: Vec<String>,
    pub chunk_types: BTreeMap<String, usize>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Chunked, embedded view of every archived company record.
///
/// The index is rebuilt whenever the archive fingerprint changes (when
/// auto-refresh is on), so records scraped by another process are picked
/// up on the next query.
pub struct KnowledgeBase {
    store: Arc<dyn CompanyStore>,
    embedder: Arc<dyn Embedder>,
    auto_refresh: bool,
    chunks: Vec<Chunk>,
    index: FlatIndex,
    fingerprint: Option<u64>,
    last_refresh: Option<DateTime<Utc>>,
}

impl KnowledgeBase {
    /// Build the index from the current archive contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be listed.
    pub fn open(
        store: Arc<dyn CompanyStore>,
        embedder: Arc<dyn Embedder>,
        auto_refresh: bool,
    ) -> Result<Self> {
        let dimension = embedder.dimension();
        let mut kb = Self {
            store,
            embedder,
            auto_refresh,
            chunks: Vec::new(),
            index: FlatIndex::new(dimension),
            fingerprint: None,
            last_refresh: None,
        };
        kb.reload()?;
        Ok(kb)
    }

    /// Rebuild the index unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be listed.
    pub fn reload(&mut self) -> Result<()> {
        let fingerprint = self.store.fingerprint()?;
        let records = self.store.load_all()?;

        let chunks: Vec<Chunk> = records
            .iter()
            .flat_map(|(ticker, data)| build_chunks(ticker, data))
            .collect();
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let mut index = FlatIndex::new(self.embedder.dimension());
        index.add(self.embedder.embed_batch(&texts));

        info!(
            chunks = chunks.len(),
            companies = records.len(),
            "Knowledge base indexed"
        );

        self.chunks = chunks;
        self.index = index;
        self.fingerprint = Some(fingerprint);
        self.last_refresh = Some(Utc::now());
        Ok(())
    }

    /// Rebuild when auto-refresh is on and the archive changed. Returns
    /// whether a rebuild happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read.
    pub fn refresh_if_needed(&mut self) -> Result<bool> {
        if !self.auto_refresh {
            return Ok(false);
        }
        let current = self.store.fingerprint()?;
        if self.fingerprint == Some(current) {
            return Ok(false);
        }
        debug!("Archive changed, refreshing knowledge base");
        self.reload()?;
        Ok(true)
    }

    /// Nearest chunks to `query`, at most `k`, optionally limited to one
    /// ticker.
    ///
    /// `3k` candidates are ranked; a candidate is kept while fewer than
    /// `k` are kept or when its kind is not yet represented.
    ///
    /// # Errors
    ///
    /// Returns an error if a refresh was needed and failed.
    pub fn search(
        &mut self,
        query: &str,
        k: usize,
        filter_ticker: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        self.refresh_if_needed()?;
        if self.index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let candidates = k.saturating_mul(3).min(self.index.len());
        let query_vector = self.embedder.embed(query);

        let mut hits: Vec<SearchHit> = Vec::with_capacity(k);
        let mut seen: HashSet<ChunkKind> = HashSet::new();
        for (id, score) in self.index.search(&query_vector, candidates) {
            let Some(chunk) = self.chunks.get(id) else {
                continue;
            };
            if filter_ticker.is_some_and(|t| !chunk.ticker.eq_ignore_ascii_case(t)) {
                continue;
            }
            if hits.len() < k || !seen.contains(&chunk.kind) {
                seen.insert(chunk.kind);
                hits.push(SearchHit {
                    chunk: chunk.clone(),
                    score,
                });
            }
            if hits.len() >= k {
                break;
            }
        }

        debug!(query, k, candidates, hits = hits.len(), "Knowledge search");
        Ok(hits)
    }

    /// Retrieved chunks formatted as prompt context.
    ///
    /// # Errors
    ///
    /// Returns an error if a refresh was needed and failed.
    pub fn context(&mut self, query: &str, k: usize, filter_ticker: Option<&str>) -> Result<String> {
        self.refresh_if_needed()?;
        if self.index.is_empty() {
            return Ok(NO_DATA.to_string());
        }

        let hits = self.search(query, k, filter_ticker)?;
        if hits.is_empty() {
            return Ok(format!(
                "No relevant information found for the query: {query}"
            ));
        }

        let mut context = String::from("=== RELEVANT COMPANY DATA ===\n\n");
        for hit in &hits {
            let chunk = &hit.chunk;
            let _ = writeln!(
                context,
                "--- {} ({}) - {} ---",
                chunk.company,
                chunk.ticker,
                chunk.kind.title()
            );
            context.push_str(&chunk.text);
            let _ = write!(context, "\n[Similarity Score: {:.3}]\n\n", hit.score);
        }
        Ok(context.trim().to_string())
    }

    /// Every chunk for `ticker`, grouped by kind.
    ///
    /// # Errors
    ///
    /// Returns an error if a refresh was needed and failed.
    pub fn company_summary(&mut self, ticker: &str) -> Result<String> {
        self.refresh_if_needed()?;

        let mut own: Vec<&Chunk> = self
            .chunks
            .iter()
            .filter(|c| c.ticker.eq_ignore_ascii_case(ticker))
            .collect();
        if own.is_empty() {
            return Ok(format!("No data found for {ticker}"));
        }
        own.sort_by_key(|c| c.kind);

        let mut summary = format!("=== COMPREHENSIVE DATA FOR {ticker} ===\n\n");
        for chunk in own {
            summary.push_str(&chunk.text);
            summary.push_str("\n\n");
        }
        Ok(summary.trim().to_string())
    }

    /// Sorted tickers with at least one chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if a refresh was needed and failed.
    pub fn available_tickers(&mut self) -> Result<Vec<String>> {
        self.refresh_if_needed()?;
        Ok(self.tickers())
    }

    /// Whether `ticker` has any indexed data.
    ///
    /// # Errors
    ///
    /// Returns an error if a refresh was needed and failed.
    pub fn contains(&mut self, ticker: &str) -> Result<bool> {
        self.refresh_if_needed()?;
        Ok(self
            .chunks
            .iter()
            .any(|c| c.ticker.eq_ignore_ascii_case(ticker)))
    }

    fn tickers(&self) -> Vec<String> {
        self.chunks
            .iter()
            .map(|c| c.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> KnowledgeStats {
        let companies = self.tickers();
        let mut chunk_types: BTreeMap<String, usize> = BTreeMap::new();
        for chunk in &self.chunks {
            *chunk_types.entry(chunk.kind.as_str().to_string()).or_default() += 1;
        }
        KnowledgeStats {
            total_chunks: self.chunks.len(),
            total_companies: companies.len(),
            companies,
            chunk_types,
            last_refresh: self.last_refresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::archive::JsonCompanyStore;
    use crate::adapter::outbound::embedding::HashingEmbedder;
    use crate::domain::{CompanyData, FinancialValue, NewsItem, Ratio};

    fn company(name: &str, pe: f64, headline: &str) -> CompanyData {
        CompanyData {
            company_name: name.into(),
            ratios: vec![Ratio {
                name: "Stock P/E".into(),
                value: Some(FinancialValue::Number(pe)),
            }],
            news: vec![NewsItem {
                title: headline.into(),
                ..NewsItem::default()
            }],
            ..CompanyData::default()
        }
    }

    fn setup(auto_refresh: bool) -> (tempfile::TempDir, Arc<JsonCompanyStore>, KnowledgeBase) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonCompanyStore::new(dir.path()));
        store
            .save("TCS", &company("Tata Consultancy", 29.0, "TCS bags cloud deal"))
            .unwrap();
        store
            .save("INFY", &company("Infosys", 24.0, "Infosys raises guidance"))
            .unwrap();
        let kb = KnowledgeBase::open(
            store.clone(),
            Arc::new(HashingEmbedder::new(256)),
            auto_refresh,
        )
        .unwrap();
        (dir, store, kb)
    }

    #[test]
    fn indexes_every_record() {
        let (_dir, _store, kb) = setup(true);
        let stats = kb.stats();
        assert_eq!(stats.total_chunks, 4);
        assert_eq!(stats.companies, vec!["INFY", "TCS"]);
        assert_eq!(stats.chunk_types["ratios"], 2);
        assert_eq!(stats.chunk_types["news"], 2);
        assert!(stats.last_refresh.is_some());
    }

    #[test]
    fn filtered_search_only_returns_that_ticker() {
        let (_dir, _store, mut kb) = setup(true);
        let hits = kb.search("cloud deal news", 3, Some("TCS")).unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.chunk.ticker == "TCS"));
    }

    #[test]
    fn search_is_capped_at_k() {
        let (_dir, _store, mut kb) = setup(true);
        assert_eq!(kb.search("P/E ratio", 1, None).unwrap().len(), 1);
        assert!(kb.search("P/E ratio", 0, None).unwrap().is_empty());
    }

    #[test]
    fn closest_chunk_ranks_first() {
        let (_dir, _store, mut kb) = setup(true);
        let hits = kb.search("Infosys raises guidance", 2, None).unwrap();
        assert_eq!(hits[0].chunk.ticker, "INFY");
        assert_eq!(hits[0].chunk.kind, ChunkKind::News);
    }

    #[test]
    fn context_formats_sections_with_scores() {
        let (_dir, _store, mut kb) = setup(true);
        let context = kb.context("valuation", 2, Some("INFY")).unwrap();
        assert!(context.starts_with("=== RELEVANT COMPANY DATA ===\n\n--- Infosys (INFY) - "));
        assert!(context.contains("[Similarity Score: "));
        assert!(!context.ends_with('\n'));
    }

    #[test]
    fn context_for_unknown_ticker_reports_no_match() {
        let (_dir, _store, mut kb) = setup(true);
        let context = kb.context("anything", 2, Some("WIPRO")).unwrap();
        assert_eq!(context, "No relevant information found for the query: anything");
    }

    #[test]
    fn empty_archive_reports_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut kb = KnowledgeBase::open(
            Arc::new(JsonCompanyStore::new(dir.path().join("missing"))),
            Arc::new(HashingEmbedder::new(64)),
            true,
        )
        .unwrap();
        assert_eq!(kb.context("q", 3, None).unwrap(), NO_DATA);
        assert!(kb.available_tickers().unwrap().is_empty());
    }

    #[test]
    fn new_records_are_picked_up_on_refresh() {
        let (_dir, store, mut kb) = setup(true);
        assert!(!kb.contains("HDFCBANK").unwrap());

        store
            .save("HDFCBANK", &company("HDFC Bank", 18.0, "HDFC Bank merger done"))
            .unwrap();

        assert!(kb.contains("HDFCBANK").unwrap());
        assert_eq!(kb.available_tickers().unwrap().len(), 3);
    }

    #[test]
    fn auto_refresh_off_keeps_snapshot() {
        let (_dir, store, mut kb) = setup(false);
        store
            .save("HDFCBANK", &company("HDFC Bank", 18.0, "HDFC Bank merger done"))
            .unwrap();

        assert!(!kb.contains("HDFCBANK").unwrap());
        kb.reload().unwrap();
        assert!(kb.contains("HDFCBANK").unwrap());
    }

    #[test]
    fn company_summary_orders_by_kind() {
        let (_dir, _store, mut kb) = setup(true);
        let summary = kb.company_summary("TCS").unwrap();
        assert!(summary.starts_with("=== COMPREHENSIVE DATA FOR TCS ===\n\nCompany: Tata Consultancy (TCS)\nKey Financial Ratios:"));
        let ratios_at = summary.find("Key Financial Ratios").unwrap();
        let news_at = summary.find("Recent News").unwrap();
        assert!(ratios_at < news_at);
        assert_eq!(kb.company_summary("NOPE").unwrap(), "No data found for NOPE");
    }
}
