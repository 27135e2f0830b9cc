//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the assistant's use cases.

pub mod assistant;
pub mod instruction;
pub mod knowledge;
pub mod portfolio;
pub mod prompt;
pub mod resolver;
pub mod scrape;

pub use assistant::{Analysis, Assistant, AssistantOptions, TradeOutcome, NO_TICKER_ANSWER};
pub use instruction::parse_instruction;
pub use knowledge::KnowledgeBase;
pub use portfolio::PortfolioService;
pub use resolver::{parse_tickers, TickerResolver};
pub use scrape::{ScrapePacing, ScrapeService, ScrapeSummary};
