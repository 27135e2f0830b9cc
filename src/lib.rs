//! Quantfolio - NSE stock research assistant and paper-trading portfolio.
//!
//! Free-text questions about Indian equities are answered by an LLM grounded
//! in fundamentals scraped from screener.in and live prices from Yahoo
//! Finance. Plain-English trade instructions are booked against a local
//! SQLite paper portfolio.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Tickers, trades, holdings, company records, indicators
//! - [`port`] - Traits for the LLM, ledger, chat history, quotes, scraping
//!   and embeddings
//! - [`adapter`] - The CLI plus SQLite, Yahoo, screener.in, Anthropic and
//!   OpenAI implementations of the ports
//! - [`application`] - Ticker resolution, the knowledge base, scraping,
//!   the portfolio service and the assistant that ties them together
//! - [`infrastructure`] - Configuration, paths and wiring
//!
//! # Example
//!
//! ```no_run
//! use quantfolio::application::parse_instruction;
//! use quantfolio::domain::TradeAction;
//!
//! let instruction = parse_instruction("buy 10 shares of Reliance", 1).unwrap();
//! assert_eq!(instruction.action, TradeAction::Buy);
//! assert_eq!(instruction.quantity, 10);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
