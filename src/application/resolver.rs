//! LLM-backed ticker resolution.
//!
//! Free text ("how is Reliance doing vs TCS?") is turned into exchange
//! tickers by asking the LLM, then every token of the reply is validated
//! with [`Ticker::parse`]. The LLM only proposes; nothing it says reaches
//! the ledger or the scraper without passing validation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::Ticker;
use crate::port::outbound::llm::Llm;

/// Reply the LLM uses when the text names no listed company.
const NO_TICKER: &str = "NONE";

/// Resolves company names in free text to exchange tickers.
pub struct TickerResolver {
    llm: Arc<dyn Llm>,
    suffix: String,
}

impl TickerResolver {
    /// Create a resolver for tickers carrying `suffix` (e.g. `.NS`).
    pub fn new(llm: Arc<dyn Llm>, suffix: impl Into<String>) -> Self {
        Self {
            llm,
            suffix: suffix.into(),
        }
    }

    /// Exchange suffix tickers must carry.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn build_prompt(&self, query: &str) -> String {
        let suffix = &self.suffix;
        format!(
            r#"Extract the NSE stock ticker symbols of every company mentioned in the text below.

Rules:
- Use the official NSE symbol with the {suffix} suffix (e.g. RELIANCE{suffix}, TCS{suffix}, INFY{suffix})
- Return only the symbols, separated by commas, with no explanation
- If no company listed on the NSE is mentioned, return {NO_TICKER}

Text: {query}"#
        )
    }

    /// Every ticker mentioned in `query`, in order of appearance.
    ///
    /// An LLM failure is logged and treated as "no tickers".
    pub async fn resolve_all(&self, query: &str) -> Vec<Ticker> {
        let prompt = self.build_prompt(query);
        let response = match self.llm.complete(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                warn!(provider = self.llm.name(), error = %err, "Ticker resolution failed");
                return Vec::new();
            }
        };

        let tickers = parse_tickers(&response, &self.suffix);
        debug!(
            provider = self.llm.name(),
            response = %response,
            resolved = tickers.len(),
            "Resolved tickers"
        );
        tickers
    }

    /// The first ticker mentioned in `query`.
    pub async fn resolve(&self, query: &str) -> Option<Ticker> {
        self.resolve_all(query).await.into_iter().next()
    }
}

/// Extract valid tickers from an LLM reply.
///
/// Tokens are split on commas and whitespace; trailing sentence dots and
/// wrapping quotes or backticks are ignored. Invalid tokens are dropped and
/// duplicates keep their first position. A bare `NONE` yields nothing.
#[must_use]
pub fn parse_tickers(response: &str, suffix: &str) -> Vec<Ticker> {
    let cleaned = response
        .trim()
        .trim_matches(|c| matches!(c, '\'' | '"' | '`'))
        .trim();
    if cleaned.eq_ignore_ascii_case(NO_TICKER) {
        return Vec::new();
    }

    let mut tickers: Vec<Ticker> = Vec::new();
    for token in cleaned.split(|c: char| c == ',' || c.is_whitespace()) {
        let token = token
            .trim_matches(|c| matches!(c, '\'' | '"' | '`' | '[' | ']' | '(' | ')'))
            .trim_end_matches(['.', ';', ':']);
        if token.is_empty() {
            continue;
        }
        if let Ok(ticker) = Ticker::parse(token, suffix) {
            if !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
    }
    tickers
}
