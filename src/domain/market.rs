//! Market data snapshots and technical indicators.

use serde::Serialize;

use super::money::Price;

/// Number of periods for the relative strength index.
pub const RSI_PERIOD: usize = 14;

/// Short moving-average window in trading days.
pub const SHORT_MA_WINDOW: usize = 50;

/// Long moving-average window in trading days.
pub const LONG_MA_WINDOW: usize = 200;

/// Latest price snapshot for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub ticker: String,
    pub price: Option<Price>,
    pub currency: Option<String>,
}

/// Headline fundamentals. Every field is optional because coverage varies
/// wildly between listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fundamentals {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub eps: Option<f64>,
}

/// Technical indicators computed from daily closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Technicals {
    pub rsi: Option<f64>,
    pub dma_50: Option<f64>,
    pub dma_200: Option<f64>,
    pub last_price: Option<f64>,
}

impl Technicals {
    /// Compute indicators from chronologically ordered closing prices.
    ///
    /// Indicators whose window is longer than the available history are
    /// left empty. All values are rounded to two decimals.
    #[must_use]
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            rsi: rsi(closes, RSI_PERIOD).map(round2),
            dma_50: sma(closes, SHORT_MA_WINDOW).map(round2),
            dma_200: sma(closes, LONG_MA_WINDOW).map(round2),
            last_price: closes.last().copied().map(round2),
        }
    }
}

/// Simple moving average over the last `window` values.
#[must_use]
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Relative strength index using rolling mean gains and losses over the
/// last `period` price changes.
///
/// Returns `None` with insufficient history or a perfectly flat window.
#[must_use]
pub fn rsi(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() <= period {
        return None;
    }
    let window = &values[values.len() - period - 1..];
    let (gain, loss) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gain, loss), delta| {
            if delta > 0.0 {
                (gain + delta, loss)
            } else {
                (gain, loss - delta)
            }
        });
    let avg_gain = gain / period as f64;
    let avg_loss = loss / period as f64;

    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
