//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the LLM provider,
//! the SQLite ledger, the quote service, the fundamentals scraper and the
//! embedding backend.

pub mod company;
pub mod embedding;
pub mod llm;
pub mod market;
pub mod store;
