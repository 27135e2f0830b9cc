//! Paper trades and parsed trade instructions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Price, Quantity};
use super::ticker::Ticker;
use crate::error::Error;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Storage label (`BUY` / `SELL`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(Error::Parse(format!("unknown trade action: {other}"))),
        }
    }
}

/// A trade instruction parsed from free text ("Buy 10 Reliance").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeInstruction {
    pub action: TradeAction,
    pub quantity: Quantity,
}

/// A row of the trade log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub id: i32,
    pub ticker: String,
    pub action: TradeAction,
    pub quantity: Quantity,
    pub price: Price,
    pub executed_at: DateTime<Utc>,
}

/// Outcome of an executed paper trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub ticker: Ticker,
    pub action: TradeAction,
    /// Executed quantity; sells are clamped to the held amount.
    pub quantity: Quantity,
    pub price: Price,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} order executed: {} shares of {} at {:.2}",
            self.action,
            self.quantity,
            self.ticker,
            self.price.round_dp(2)
        )
    }
}
