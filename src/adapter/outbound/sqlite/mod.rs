//! SQLite persistence using Diesel ORM.
//!
//! - [`SqliteLedger`] holds paper-trading holdings and the trade log.
//! - [`SqliteChatHistory`] keeps past assistant queries.

pub mod database;
pub mod history;
pub mod ledger;

pub use database::connection::{open, DbPool};
pub use history::SqliteChatHistory;
pub use ledger::SqliteLedger;
