//! Paper-trading portfolio service.
//!
//! Trades execute at the live price from the market data port and are
//! booked in the ledger. Listing the portfolio joins every holding with its
//! live price; a failed quote only blanks that row's price.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    Execution, Holding, PositionStatus, Price, Quantity, Ticker, TradeAction, TradeInstruction,
    TradeRecord,
};
use crate::error::{Result, TradeError};
use crate::port::outbound::market::MarketData;
use crate::port::outbound::store::Ledger;

/// Executes paper trades and values holdings.
pub struct PortfolioService<L> {
    ledger: L,
    market: Arc<dyn MarketData>,
}

impl<L: Ledger> PortfolioService<L> {
    pub fn new(ledger: L, market: Arc<dyn MarketData>) -> Self {
        Self { ledger, market }
    }

    /// Live price, or `None` when the quote is missing or the request failed.
    pub async fn live_price(&self, ticker: &Ticker) -> Option<Price> {
        match self.market.live_price(ticker).await {
            Ok(price) => price,
            Err(err) => {
                warn!(ticker = %ticker, error = %err, "Live price lookup failed");
                None
            }
        }
    }

    /// Execute a parsed instruction at the live price.
    ///
    /// # Errors
    ///
    /// Returns [`TradeError::PriceUnavailable`] without a live price, plus
    /// whatever the ledger rejects (zero quantity, selling without a
    /// holding).
    pub async fn execute(
        &self,
        ticker: &Ticker,
        instruction: TradeInstruction,
    ) -> Result<Execution> {
        match instruction.action {
            TradeAction::Buy => self.buy(ticker, instruction.quantity).await,
            TradeAction::Sell => self.sell(ticker, instruction.quantity).await,
        }
    }

    /// Buy at the live price.
    ///
    /// # Errors
    ///
    /// See [`PortfolioService::execute`].
    pub async fn buy(&self, ticker: &Ticker, quantity: Quantity) -> Result<Execution> {
        if quantity <= 0 {
            return Err(TradeError::ZeroQuantity.into());
        }
        let price = self.require_price(ticker).await?;
        let holding = self.ledger.buy(ticker, price, quantity).await?;
        info!(
            ticker = %ticker,
            quantity,
            price = %price,
            held = holding.quantity,
            avg_price = %holding.avg_price,
            "Bought"
        );
        Ok(Execution {
            ticker: ticker.clone(),
            action: TradeAction::Buy,
            quantity,
            price,
        })
    }

    /// Sell at the live price. The executed quantity is clamped to the
    /// quantity held.
    ///
    /// # Errors
    ///
    /// See [`PortfolioService::execute`].
    pub async fn sell(&self, ticker: &Ticker, quantity: Quantity) -> Result<Execution> {
        if quantity <= 0 {
            return Err(TradeError::ZeroQuantity.into());
        }
        let price = self.require_price(ticker).await?;
        let executed = self.ledger.sell(ticker, price, quantity).await?;
        if executed < quantity {
            warn!(ticker = %ticker, requested = quantity, executed, "Sell clamped to holding");
        }
        info!(ticker = %ticker, quantity = executed, price = %price, "Sold");
        Ok(Execution {
            ticker: ticker.clone(),
            action: TradeAction::Sell,
            quantity: executed,
            price,
        })
    }

    async fn require_price(&self, ticker: &Ticker) -> Result<Price> {
        self.live_price(ticker).await.ok_or_else(|| {
            TradeError::PriceUnavailable {
                ticker: ticker.to_string(),
            }
            .into()
        })
    }

    /// Every holding with its live price and unrealized P&L.
    ///
    /// # Errors
    ///
    /// Returns an error only if the ledger cannot be read.
    pub async fn status(&self) -> Result<Vec<PositionStatus>> {
        let holdings = self.ledger.holdings().await?;
        let mut rows = Vec::with_capacity(holdings.len());
        for holding in holdings {
            let live = match Ticker::parse(&holding.ticker, suffix_of(&holding.ticker)) {
                Ok(ticker) => self.live_price(&ticker).await,
                Err(err) => {
                    warn!(ticker = %holding.ticker, error = %err, "Stored ticker is invalid");
                    None
                }
            };
            rows.push(holding.valued_at(live));
        }
        Ok(rows)
    }

    /// All holdings at book cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub async fn holdings(&self) -> Result<Vec<Holding>> {
        self.ledger.holdings().await
    }

    /// The most recent trades, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub async fn trades(&self, limit: usize) -> Result<Vec<TradeRecord>> {
        self.ledger.trades(limit).await
    }

    /// Delete every holding and trade.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    pub async fn reset(&self) -> Result<()> {
        self.ledger.reset().await?;
        info!("Portfolio reset");
        Ok(())
    }
}

/// The `.XX` suffix of a stored ticker, or an empty string.
fn suffix_of(ticker: &str) -> &str {
    ticker.rfind('.').map_or("", |i| &ticker[i..])
}
