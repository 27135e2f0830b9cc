//! Persistence ports for the paper-trading ledger and chat history.

use std::future::Future;

use crate::domain::{ChatEntry, Holding, Price, Quantity, Ticker, TradeRecord};
use crate::error::Result;

/// Storage operations for holdings and the trade log.
pub trait Ledger: Send + Sync {
    /// Record a purchase, folding it into the holding's average cost.
    fn buy(
        &self,
        ticker: &Ticker,
        price: Price,
        quantity: Quantity,
    ) -> impl Future<Output = Result<Holding>> + Send;

    /// Record a sale. Returns the executed quantity, which is clamped to
    /// the quantity held.
    fn sell(
        &self,
        ticker: &Ticker,
        price: Price,
        quantity: Quantity,
    ) -> impl Future<Output = Result<Quantity>> + Send;

    /// Get a single holding.
    fn holding(&self, ticker: &Ticker) -> impl Future<Output = Result<Option<Holding>>> + Send;

    /// List all holdings ordered by ticker.
    fn holdings(&self) -> impl Future<Output = Result<Vec<Holding>>> + Send;

    /// List the most recent trades, newest first.
    fn trades(&self, limit: usize) -> impl Future<Output = Result<Vec<TradeRecord>>> + Send;

    /// Delete every holding and trade.
    fn reset(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Storage operations for past assistant queries.
pub trait ChatHistory: Send + Sync {
    /// Append an entry. Returns its id.
    fn save(&self, query: &str, response: &str) -> impl Future<Output = Result<i32>> + Send;

    /// List entries in insertion order.
    fn list(&self) -> impl Future<Output = Result<Vec<ChatEntry>>> + Send;

    /// Delete an entry by id. Returns false when it did not exist.
    fn delete(&self, id: i32) -> impl Future<Output = Result<bool>> + Send;

    /// Delete every entry. Returns the count removed.
    fn clear(&self) -> impl Future<Output = Result<usize>> + Send;
}
