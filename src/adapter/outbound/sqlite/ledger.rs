//! SQLite paper-trading ledger.
//!
//! Holdings carry an average acquisition cost; every buy or sell appends a
//! row to the trade log inside the same transaction as the holding update.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use super::database::connection::{DbConn, DbPool};
use super::database::model::{HoldingRow, NewTradeRow, TradeRow};
use super::database::schema::{holdings, trades};
use crate::domain::{Holding, Price, Quantity, Ticker, TradeAction, TradeRecord};
use crate::error::{Error, Result, TradeError};
use crate::port::outbound::store::Ledger;

/// SQLite-backed [`Ledger`].
pub struct SqliteLedger {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteLedger {
    /// Create a ledger over the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn holding_from_row(row: HoldingRow) -> Result<Holding> {
        Ok(Holding {
            avg_price: parse_price(&row.avg_price)?,
            ticker: row.ticker,
            quantity: row.quantity,
        })
    }

    fn trade_from_row(row: TradeRow) -> Result<TradeRecord> {
        Ok(TradeRecord {
            id: row.id.unwrap_or_default(),
            action: TradeAction::from_str(&row.action)?,
            price: parse_price(&row.price)?,
            executed_at: parse_timestamp(&row.executed_at)?,
            ticker: row.ticker,
            quantity: row.quantity,
        })
    }

    fn trade_row(
        ticker: &Ticker,
        action: TradeAction,
        price: Price,
        quantity: Quantity,
        now: &str,
    ) -> NewTradeRow {
        NewTradeRow {
            ticker: ticker.to_string(),
            action: action.as_str().to_string(),
            quantity,
            price: price.normalize().to_string(),
            executed_at: now.to_string(),
        }
    }
}

fn parse_price(raw: &str) -> Result<Price> {
    Decimal::from_str(raw).map_err(|e| Error::Parse(format!("invalid stored price '{raw}': {e}")))
}

pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

impl Ledger for SqliteLedger {
    async fn buy(&self, ticker: &Ticker, price: Price, quantity: Quantity) -> Result<Holding> {
        if quantity <= 0 {
            return Err(TradeError::ZeroQuantity.into());
        }
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        let row = conn.transaction::<HoldingRow, Error, _>(|conn| {
            let existing: Option<HoldingRow> = holdings::table
                .find(ticker.as_str())
                .select(HoldingRow::as_select())
                .first(conn)
                .optional()?;

            let row = match existing {
                Some(row) => {
                    let current = Self::holding_from_row(row)?;
                    let avg = current.averaged_with(quantity, price).ok_or_else(|| {
                        Error::Database(format!("quantity overflow for {ticker}"))
                    })?;
                    HoldingRow {
                        ticker: ticker.to_string(),
                        quantity: current.quantity + quantity,
                        avg_price: avg.normalize().to_string(),
                        updated_at: now.clone(),
                    }
                }
                None => HoldingRow {
                    ticker: ticker.to_string(),
                    quantity,
                    avg_price: price.normalize().to_string(),
                    updated_at: now.clone(),
                },
            };

            diesel::replace_into(holdings::table)
                .values(&row)
                .execute(conn)?;
            diesel::insert_into(trades::table)
                .values(&Self::trade_row(ticker, TradeAction::Buy, price, quantity, &now))
                .execute(conn)?;

            Ok(row)
        })?;

        debug!(ticker = %ticker, quantity, price = %price, "Recorded buy");
        Self::holding_from_row(row)
    }

    async fn sell(&self, ticker: &Ticker, price: Price, quantity: Quantity) -> Result<Quantity> {
        if quantity <= 0 {
            return Err(TradeError::ZeroQuantity.into());
        }
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        let executed = conn.transaction::<Quantity, Error, _>(|conn| {
            let existing: HoldingRow = holdings::table
                .find(ticker.as_str())
                .select(HoldingRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| TradeError::NoHolding {
                    ticker: ticker.to_string(),
                })?;

            let executed = quantity.min(existing.quantity);
            let remaining = existing.quantity - executed;

            if remaining <= 0 {
                diesel::delete(holdings::table.find(ticker.as_str())).execute(conn)?;
            } else {
                diesel::update(holdings::table.find(ticker.as_str()))
                    .set((
                        holdings::quantity.eq(remaining),
                        holdings::updated_at.eq(now.as_str()),
                    ))
                    .execute(conn)?;
            }

            diesel::insert_into(trades::table)
                .values(&Self::trade_row(ticker, TradeAction::Sell, price, executed, &now))
                .execute(conn)?;

            Ok(executed)
        })?;

        debug!(ticker = %ticker, requested = quantity, executed, price = %price, "Recorded sell");
        Ok(executed)
    }

    async fn holding(&self, ticker: &Ticker) -> Result<Option<Holding>> {
        let mut conn = self.conn()?;
        let row: Option<HoldingRow> = holdings::table
            .find(ticker.as_str())
            .select(HoldingRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(Self::holding_from_row).transpose()
    }

    async fn holdings(&self) -> Result<Vec<Holding>> {
        let mut conn = self.conn()?;
        let rows: Vec<HoldingRow> = holdings::table
            .select(HoldingRow::as_select())
            .order(holdings::ticker.asc())
            .load(&mut conn)?;
        rows.into_iter().map(Self::holding_from_row).collect()
    }

    async fn trades(&self, limit: usize) -> Result<Vec<TradeRecord>> {
        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<TradeRow> = trades::table
            .select(TradeRow::as_select())
            .order(trades::id.desc())
            .limit(limit)
            .load(&mut conn)?;
        rows.into_iter().map(Self::trade_from_row).collect()
    }

    async fn reset(&self) -> Result<()> {
        let mut conn = self.conn()?;
        conn.transaction::<(), Error, _>(|conn| {
            diesel::delete(trades::table).execute(conn)?;
            diesel::delete(holdings::table).execute(conn)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use rust_decimal_macros::dec;

    fn setup() -> (tempfile::TempDir, SqliteLedger) {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = open(&dir.path().join("ledger.db")).expect("open db");
        (dir, SqliteLedger::new(pool))
    }

    fn ticker(s: &str) -> Ticker {
        Ticker::nse(s).unwrap()
    }

    // -------------------------------------------------------------------------
    // Buys
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn first_buy_creates_holding_at_trade_price() {
        let (_dir, ledger) = setup();
        let holding = ledger.buy(&ticker("TCS.NS"), dec!(3500.50), 10).await.unwrap();

        assert_eq!(holding.quantity, 10);
        assert_eq!(holding.avg_price, dec!(3500.50));
    }

    #[tokio::test]
    async fn buy_increases_quantity_by_traded_amount() {
        let (_dir, ledger) = setup();
        let t = ticker("INFY.NS");
        ledger.buy(&t, dec!(1500), 10).await.unwrap();
        ledger.buy(&t, dec!(1600), 5).await.unwrap();

        let holding = ledger.holding(&t).await.unwrap().unwrap();
        assert_eq!(holding.quantity, 15);
    }

    #[tokio::test]
    async fn repeated_buys_use_weighted_average_cost() {
        let (_dir, ledger) = setup();
        let t = ticker("RELIANCE.NS");
        ledger.buy(&t, dec!(100), 10).await.unwrap();
        let holding = ledger.buy(&t, dec!(200), 30).await.unwrap();

        assert_eq!(holding.avg_price, dec!(175));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let (_dir, ledger) = setup();
        let err = ledger.buy(&ticker("TCS.NS"), dec!(1), 0).await.unwrap_err();
        assert!(matches!(err, Error::Trade(TradeError::ZeroQuantity)));
        assert!(ledger.trades(10).await.unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // Sells
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn sell_without_holding_fails_and_logs_nothing() {
        let (_dir, ledger) = setup();
        let err = ledger.sell(&ticker("TCS.NS"), dec!(1), 1).await.unwrap_err();

        assert!(matches!(err, Error::Trade(TradeError::NoHolding { .. })));
        assert!(ledger.trades(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_sell_keeps_average_cost() {
        let (_dir, ledger) = setup();
        let t = ticker("HDFCBANK.NS");
        ledger.buy(&t, dec!(1650.25), 8).await.unwrap();

        let executed = ledger.sell(&t, dec!(1700), 3).await.unwrap();
        let holding = ledger.holding(&t).await.unwrap().unwrap();

        assert_eq!(executed, 3);
        assert_eq!(holding.quantity, 5);
        assert_eq!(holding.avg_price, dec!(1650.25));
    }

    #[tokio::test]
    async fn oversell_is_clamped_and_removes_holding() {
        let (_dir, ledger) = setup();
        let t = ticker("ITC.NS");
        ledger.buy(&t, dec!(450), 4).await.unwrap();

        let executed = ledger.sell(&t, dec!(460), 10).await.unwrap();

        assert_eq!(executed, 4);
        assert!(ledger.holding(&t).await.unwrap().is_none());
        let trades = ledger.trades(10).await.unwrap();
        assert_eq!(trades[0].action, TradeAction::Sell);
        assert_eq!(trades[0].quantity, 4);
    }

    // -------------------------------------------------------------------------
    // Listing and reset
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn every_trade_is_logged_newest_first() {
        let (_dir, ledger) = setup();
        let t = ticker("SBIN.NS");
        ledger.buy(&t, dec!(800), 2).await.unwrap();
        ledger.buy(&t, dec!(810), 1).await.unwrap();
        ledger.sell(&t, dec!(820), 1).await.unwrap();

        let trades = ledger.trades(10).await.unwrap();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].action, TradeAction::Sell);
        assert_eq!(trades[2].price, dec!(800));
        assert!(trades[0].id > trades[2].id);

        assert_eq!(ledger.trades(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn holdings_are_ordered_by_ticker() {
        let (_dir, ledger) = setup();
        ledger.buy(&ticker("WIPRO.NS"), dec!(1), 1).await.unwrap();
        ledger.buy(&ticker("AXISBANK.NS"), dec!(1), 1).await.unwrap();

        let tickers: Vec<String> = ledger
            .holdings()
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.ticker)
            .collect();
        assert_eq!(tickers, vec!["AXISBANK.NS", "WIPRO.NS"]);
    }

    #[tokio::test]
    async fn reset_clears_holdings_and_trades() {
        let (_dir, ledger) = setup();
        ledger.buy(&ticker("TCS.NS"), dec!(1), 1).await.unwrap();

        ledger.reset().await.unwrap();

        assert!(ledger.holdings().await.unwrap().is_empty());
        assert!(ledger.trades(10).await.unwrap().is_empty());
    }
}
