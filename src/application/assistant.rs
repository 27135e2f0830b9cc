//! Research assistant: stock analysis and paper trading from free text.
//!
//! # Analysis flow
//!
//! ```text
//! query -> TickerResolver -> scrape missing symbols -> KnowledgeBase context
//!       -> live price lines -> analyst prompt -> LLM -> answer (+ history)
//! ```

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use super::instruction::parse_instruction;
use super::knowledge::KnowledgeBase;
use super::portfolio::PortfolioService;
use super::prompt::{analyst_prompt, section};
use super::resolver::TickerResolver;
use super::scrape::ScrapeService;
use crate::domain::{Execution, PositionStatus, Quantity, Ticker};
use crate::error::{Error, ResolveError, Result, TradeError};
use crate::port::outbound::llm::Llm;
use crate::port::outbound::store::{ChatHistory, Ledger};

/// Answer given when no ticker could be identified.
pub const NO_TICKER_ANSWER: &str =
    "I could not identify any valid stock tickers in your query. Please specify a valid NSE stock.";

/// Result of [`Assistant::analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub answer: String,
    pub tickers: Vec<Ticker>,
    /// Symbols scraped on demand for this query.
    pub scraped: Vec<String>,
}

/// Result of [`Assistant::trade`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradeOutcome {
    Executed(Execution),
    /// The trade was understood but could not be booked (selling a stock
    /// that is not held).
    Rejected { ticker: Ticker, reason: String },
}

/// Retrieval and trading settings of the assistant.
#[derive(Debug, Clone, Copy)]
pub struct AssistantOptions {
    /// Chunks retrieved per ticker.
    pub top_k: usize,
    /// Quantity used when an instruction names none.
    pub default_quantity: Quantity,
}

/// Ties resolution, retrieval, the LLM and the ledger together.
pub struct Assistant<L, H> {
    resolver: TickerResolver,
    llm: Arc<dyn Llm>,
    knowledge: KnowledgeBase,
    scraper: ScrapeService,
    portfolio: PortfolioService<L>,
    history: H,
    options: AssistantOptions,
}

impl<L: Ledger, H: ChatHistory> Assistant<L, H> {
    pub fn new(
        resolver: TickerResolver,
        llm: Arc<dyn Llm>,
        knowledge: KnowledgeBase,
        scraper: ScrapeService,
        portfolio: PortfolioService<L>,
        history: H,
        options: AssistantOptions,
    ) -> Self {
        Self {
            resolver,
            llm,
            knowledge,
            scraper,
            portfolio,
            history,
            options,
        }
    }

    /// Answer a research question about one or more stocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or the knowledge base or
    /// history cannot be read or written. Scrape failures are logged and
    /// the answer is built from whatever data exists.
    pub async fn analyze(&mut self, query: &str) -> Result<Analysis> {
        let tickers = self.resolver.resolve_all(query).await;
        if tickers.is_empty() {
            info!(query, "No ticker identified");
            self.history.save(query, NO_TICKER_ANSWER).await?;
            return Ok(Analysis {
                answer: NO_TICKER_ANSWER.to_string(),
                tickers,
                scraped: Vec::new(),
            });
        }

        let scraped = self.scrape_missing(&tickers).await?;

        let mut context = String::new();
        let mut realtime = String::new();
        for ticker in &tickers {
            let symbol = ticker.symbol();
            let mut block = self
                .knowledge
                .context(query, self.options.top_k, Some(symbol))?;
            if block.trim().is_empty() {
                block = format!("No specific data available from screener.in for {symbol}.");
            }
            context.push_str(&section(symbol, &block));
            realtime.push_str(&section(symbol, &self.price_line(ticker).await));
        }

        let prompt = analyst_prompt(Local::now().date_naive(), &context, &realtime, query);
        let answer = self.llm.complete(&prompt).await?;
        info!(
            provider = self.llm.name(),
            tickers = tickers.len(),
            answer_len = answer.len(),
            "Analysis complete"
        );

        self.history.save(query, &answer).await?;
        Ok(Analysis {
            answer,
            tickers,
            scraped,
        })
    }

    async fn scrape_missing(&mut self, tickers: &[Ticker]) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for ticker in tickers {
            if !self.knowledge.contains(ticker.symbol())? {
                missing.push(ticker.symbol().to_string());
            }
        }
        if missing.is_empty() {
            return Ok(missing);
        }

        info!(symbols = ?missing, "Scraping symbols missing from the knowledge base");
        let summary = self.scraper.scrape_and_save(&missing).await;
        for failure in &summary.failed {
            warn!(
                symbol = %failure.symbol,
                reason = %failure.reason,
                "Continuing without scraped data"
            );
        }
        self.knowledge.reload()?;
        Ok(summary.succeeded.into_iter().map(|s| s.symbol).collect())
    }

    async fn price_line(&self, ticker: &Ticker) -> String {
        match self.portfolio.live_price(ticker).await {
            Some(price) => format!("Live Price of {ticker}: {:.2}", price.round_dp(2)),
            None => format!("Could not fetch live price for {ticker}"),
        }
    }

    /// Execute a paper trade described in free text ("Sell 5 TCS").
    ///
    /// # Errors
    ///
    /// Returns [`TradeError::MissingAction`] for text that is not a trade,
    /// [`ResolveError::NoTicker`] when no stock is named,
    /// [`TradeError::PriceUnavailable`] without a live quote, and storage
    /// errors from the ledger or history.
    pub async fn trade(&self, instruction: &str) -> Result<TradeOutcome> {
        let parsed = parse_instruction(instruction, self.options.default_quantity)?;
        let ticker = self
            .resolver
            .resolve(instruction)
            .await
            .ok_or_else(|| ResolveError::NoTicker {
                query: instruction.trim().to_string(),
            })?;

        match self.portfolio.execute(&ticker, parsed).await {
            Ok(execution) => {
                self.history
                    .save(instruction, &execution.to_string())
                    .await?;
                Ok(TradeOutcome::Executed(execution))
            }
            Err(Error::Trade(err @ TradeError::NoHolding { .. })) => {
                warn!(ticker = %ticker, "Sell rejected: nothing held");
                Ok(TradeOutcome::Rejected {
                    ticker,
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Every holding with live price and unrealized P&L.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub async fn portfolio_status(&self) -> Result<Vec<PositionStatus>> {
        self.portfolio.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::archive::JsonCompanyStore;
    use crate::adapter::outbound::embedding::HashingEmbedder;
    use crate::adapter::outbound::llm::client::tests::MockLlm;
    use crate::adapter::outbound::screener::mock::tests::MockSource;
    use crate::adapter::outbound::sqlite::{open, SqliteChatHistory, SqliteLedger};
    use crate::adapter::outbound::yahoo::mock::tests::MockMarketData;
    use crate::application::scrape::ScrapePacing;
    use crate::domain::{CompanyData, FinancialValue, Ratio, TradeAction, NSE_SUFFIX};
    use crate::port::outbound::company::CompanyStore;
    use rust_decimal_macros::dec;

    struct Fixture {
        _dir: tempfile::TempDir,
        llm: Arc<MockLlm>,
        source: Arc<MockSource>,
        assistant: Assistant<SqliteLedger, SqliteChatHistory>,
        history: SqliteChatHistory,
    }

    fn tcs_record() -> CompanyData {
        CompanyData {
            company_name: "Tata Consultancy Services".into(),
            ratios: vec![Ratio {
                name: "Stock P/E".into(),
                value: Some(FinancialValue::Number(29.4)),
            }],
            ..CompanyData::default()
        }
    }

    fn fixture(llm: MockLlm, source: MockSource, archived: &[(&str, CompanyData)]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir.path().join("q.db")).unwrap();
        let store = Arc::new(JsonCompanyStore::new(dir.path().join("data")));
        for (symbol, data) in archived {
            store.save(symbol, data).unwrap();
        }
        let llm = Arc::new(llm);
        let source = Arc::new(source);
        let market = MockMarketData::new().with_price("TCS.NS", dec!(3512.456));

        let knowledge =
            KnowledgeBase::open(store.clone(), Arc::new(HashingEmbedder::new(128)), true).unwrap();
        let assistant = Assistant::new(
            TickerResolver::new(llm.clone(), NSE_SUFFIX),
            llm.clone(),
            knowledge,
            ScrapeService::new(source.clone(), store, ScrapePacing::NONE),
            PortfolioService::new(SqliteLedger::new(pool.clone()), Arc::new(market)),
            SqliteChatHistory::new(pool.clone()),
            AssistantOptions {
                top_k: 3,
                default_quantity: 1,
            },
        );
        Fixture {
            _dir: dir,
            llm,
            source,
            assistant,
            history: SqliteChatHistory::new(pool),
        }
    }

    #[tokio::test]
    async fn analyze_builds_prompt_from_context_and_price() {
        let mut fx = fixture(
            MockLlm::sequence(["TCS.NS", "TCS looks fairly valued."]),
            MockSource::new(),
            &[("TCS", tcs_record())],
        );

        let analysis = fx.assistant.analyze("How is TCS doing?").await.unwrap();

        assert_eq!(analysis.answer, "TCS looks fairly valued.");
        assert_eq!(analysis.tickers[0].as_str(), "TCS.NS");
        assert!(analysis.scraped.is_empty());
        assert!(fx.source.calls().is_empty());

        let prompts = fx.llm.prompts();
        let prompt = &prompts[1];
        assert!(prompt.contains("\n--- TCS ---\n=== RELEVANT COMPANY DATA ==="));
        assert!(prompt.contains("Stock P/E: 29.4"));
        assert!(prompt.contains("Live Price of TCS.NS: 3512.46"));
        assert!(prompt.contains("How is TCS doing?"));

        let saved = fx.history.list().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].response, "TCS looks fairly valued.");
    }

    #[tokio::test]
    async fn analyze_scrapes_missing_symbols_first() {
        let mut fx = fixture(
            MockLlm::sequence(["TCS.NS", "answer"]),
            MockSource::new().with("TCS", tcs_record()),
            &[],
        );

        let analysis = fx.assistant.analyze("TCS?").await.unwrap();

        assert_eq!(analysis.scraped, vec!["TCS"]);
        assert_eq!(fx.source.calls(), vec!["TCS"]);
        assert!(fx.llm.prompts()[1].contains("Stock P/E: 29.4"));
    }

    #[tokio::test]
    async fn analyze_survives_failed_scrape_and_missing_price() {
        let mut fx = fixture(
            MockLlm::sequence(["INFY.NS", "answer"]),
            MockSource::new(),
            &[],
        );

        let analysis = fx.assistant.analyze("Infosys?").await.unwrap();

        assert!(analysis.scraped.is_empty());
        let prompt = &fx.llm.prompts()[1];
        assert!(prompt.contains("Could not fetch live price for INFY.NS"));
        assert!(prompt.contains(crate::application::knowledge::NO_DATA));
    }

    #[tokio::test]
    async fn analyze_without_ticker_answers_politely() {
        let mut fx = fixture(MockLlm::new("NONE"), MockSource::new(), &[]);

        let analysis = fx.assistant.analyze("What's the weather?").await.unwrap();

        assert_eq!(analysis.answer, NO_TICKER_ANSWER);
        assert!(analysis.tickers.is_empty());
        assert_eq!(fx.llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn trade_buys_at_live_price_and_records_history() {
        let fx = fixture(MockLlm::new("TCS.NS"), MockSource::new(), &[]);

        let outcome = fx.assistant.trade("Buy 10 TCS").await.unwrap();

        let TradeOutcome::Executed(execution) = outcome else {
            panic!("expected execution");
        };
        assert_eq!(execution.action, TradeAction::Buy);
        assert_eq!(execution.quantity, 10);
        assert_eq!(execution.price, dec!(3512.456));

        let status = fx.assistant.portfolio_status().await.unwrap();
        assert_eq!(status[0].quantity, 10);
        let saved = fx.history.list().await.unwrap();
        assert_eq!(
            saved[0].response,
            "BUY order executed: 10 shares of TCS.NS at 3512.46"
        );
    }

    #[tokio::test]
    async fn sell_without_holding_is_rejected_not_failed() {
        let fx = fixture(MockLlm::new("TCS.NS"), MockSource::new(), &[]);

        let outcome = fx.assistant.trade("sell 2 TCS").await.unwrap();

        assert!(matches!(outcome, TradeOutcome::Rejected { .. }));
        assert!(fx.history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn trade_parses_instruction_before_calling_llm() {
        let fx = fixture(MockLlm::new("TCS.NS"), MockSource::new(), &[]);

        let err = fx.assistant.trade("TCS 10").await.unwrap_err();

        assert!(matches!(err, Error::Trade(TradeError::MissingAction { .. })));
        assert!(fx.llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn trade_without_ticker_is_resolve_error() {
        let fx = fixture(MockLlm::new("NONE"), MockSource::new(), &[]);

        let err = fx.assistant.trade("buy 1 of something").await.unwrap_err();

        assert!(matches!(err, Error::Resolve(ResolveError::NoTicker { .. })));
    }

    #[tokio::test]
    async fn trade_without_price_fails() {
        let fx = fixture(MockLlm::new("WIPRO.NS"), MockSource::new(), &[]);

        let err = fx.assistant.trade("buy 1 Wipro").await.unwrap_err();

        assert!(matches!(
            err,
            Error::Trade(TradeError::PriceUnavailable { .. })
        ));
    }
}
