//! Market data port.

use async_trait::async_trait;

use crate::domain::{Fundamentals, Price, Technicals, Ticker};
use crate::error::Result;

/// Source of live prices, fundamentals and price history.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Latest traded price, or `None` when the source has no price.
    async fn live_price(&self, ticker: &Ticker) -> Result<Option<Price>>;

    /// Headline fundamentals.
    async fn fundamentals(&self, ticker: &Ticker) -> Result<Fundamentals>;

    /// Technical indicators over the configured history range.
    async fn technicals(&self, ticker: &Ticker) -> Result<Technicals>;
}
