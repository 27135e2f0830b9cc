//! Scraper, knowledge base and assistant wiring.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::outbound::archive::JsonCompanyStore;
use crate::adapter::outbound::embedding::HashingEmbedder;
use crate::adapter::outbound::screener::ScreenerClient;
use crate::adapter::outbound::sqlite::{SqliteChatHistory, SqliteLedger};
use crate::application::{
    Assistant, AssistantOptions, KnowledgeBase, PortfolioService, ScrapePacing, ScrapeService,
    TickerResolver,
};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::company::CompanyStore;

use super::llm::build_llm_client;
use super::market::build_market_data;
use super::persistence::build_stores;

/// The assistant as wired for the command line.
pub type CliAssistant = Assistant<SqliteLedger, SqliteChatHistory>;

/// Archive of scraped records under the configured data directory.
#[must_use]
pub fn build_company_store(config: &Config) -> Arc<dyn CompanyStore> {
    Arc::new(JsonCompanyStore::new(&config.data_dir))
}

/// Batch pacing from the scraper section.
#[must_use]
pub fn scrape_pacing(config: &Config) -> ScrapePacing {
    ScrapePacing {
        delay: Duration::from_millis(config.scraper.delay_ms),
        failure_step: Duration::from_millis(config.scraper.failure_delay_step_ms),
        max_delay: Duration::from_millis(config.scraper.max_delay_ms),
    }
}

/// Scrape service writing to `store`.
#[must_use]
pub fn build_scrape_service(config: &Config, store: Arc<dyn CompanyStore>) -> ScrapeService {
    ScrapeService::new(
        Arc::new(ScreenerClient::from_config(&config.scraper)),
        store,
        scrape_pacing(config),
    )
}

/// Knowledge base over `store`.
///
/// # Errors
///
/// Returns an error if the archive cannot be listed.
pub fn build_knowledge_base(config: &Config, store: Arc<dyn CompanyStore>) -> Result<KnowledgeBase> {
    KnowledgeBase::open(
        store,
        Arc::new(HashingEmbedder::new(config.knowledge.dimension)),
        config.knowledge.auto_refresh,
    )
}

/// Portfolio service over the configured database and quote service.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn build_portfolio(config: &Config) -> Result<PortfolioService<SqliteLedger>> {
    let (ledger, _) = build_stores(config)?;
    Ok(PortfolioService::new(ledger, build_market_data(config)))
}

/// Fully wired assistant.
///
/// # Errors
///
/// Returns an error if the LLM API key is missing, the database cannot be
/// opened or the archive cannot be listed.
pub fn build_assistant(config: &Config) -> Result<CliAssistant> {
    let llm = build_llm_client(config)?;
    let (ledger, history) = build_stores(config)?;
    let store = build_company_store(config);

    Ok(Assistant::new(
        TickerResolver::new(llm.clone(), &config.trading.exchange_suffix),
        llm,
        build_knowledge_base(config, store.clone())?,
        build_scrape_service(config, store),
        PortfolioService::new(ledger, build_market_data(config)),
        history,
        AssistantOptions {
            top_k: config.knowledge.top_k,
            default_quantity: config.trading.default_quantity,
        },
    ))
}
