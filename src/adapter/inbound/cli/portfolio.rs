//! Handler for the `portfolio` command group.

use rust_decimal::Decimal;
use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::domain::{PositionStatus, Price, TradeRecord};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::research::build_portfolio;

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Avg Price")]
    avg_price: String,
    #[tabled(rename = "Live Price")]
    live_price: String,
    #[tabled(rename = "Unrealized P&L")]
    pnl: String,
}

impl From<&PositionStatus> for HoldingRow {
    fn from(status: &PositionStatus) -> Self {
        Self {
            ticker: status.ticker.clone(),
            quantity: status.quantity,
            avg_price: money(status.avg_price),
            live_price: status.live_price.map_or_else(|| "n/a".to_string(), money),
            pnl: status.unrealized_pnl.map_or_else(|| "n/a".to_string(), signed),
        }
    }
}

#[derive(Tabled)]
struct TradeRow {
    #[tabled(rename = "#")]
    id: i32,
    #[tabled(rename = "When (UTC)")]
    executed_at: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&TradeRecord> for TradeRow {
    fn from(trade: &TradeRecord) -> Self {
        Self {
            id: trade.id,
            executed_at: trade.executed_at.format("%Y-%m-%d %H:%M").to_string(),
            action: trade.action.to_string(),
            ticker: trade.ticker.clone(),
            quantity: trade.quantity,
            price: money(trade.price),
        }
    }
}

fn money(value: Price) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn signed(value: Price) -> String {
    let text = format!("{:+.2}", value.round_dp(2));
    if value > Decimal::ZERO {
        output::positive(text)
    } else if value < Decimal::ZERO {
        output::negative(text)
    } else {
        text
    }
}

/// Execute `portfolio show`.
pub async fn execute_show(config: &Config) -> Result<()> {
    let portfolio = build_portfolio(config)?;

    let pb = output::spinner("Fetching live prices");
    let statuses = portfolio.status().await?;
    pb.finish_and_clear();

    if output::is_json() {
        output::json_output(json!({
            "command": "portfolio.show",
            "holdings": statuses,
        }));
        return Ok(());
    }

    if statuses.is_empty() {
        output::note("No holdings yet.");
        output::hint("quantfolio trade \"buy 10 shares of TCS\"");
        return Ok(());
    }

    output::table(statuses.iter().map(HoldingRow::from));

    let cost: Price = statuses
        .iter()
        .map(|s| Decimal::from(s.quantity) * s.avg_price)
        .sum();
    let pnl: Price = statuses.iter().filter_map(|s| s.unrealized_pnl).sum();
    output::field("Cost basis", money(cost));
    output::field("Unrealized", signed(pnl));
    if statuses.iter().any(|s| s.live_price.is_none()) {
        output::warning("Some live prices were unavailable and are excluded from the P&L");
    }
    Ok(())
}

/// Execute `portfolio trades`.
pub async fn execute_trades(config: &Config, limit: usize) -> Result<()> {
    let portfolio = build_portfolio(config)?;
    let trades = portfolio.trades(limit).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "portfolio.trades",
            "trades": trades,
        }));
        return Ok(());
    }

    if trades.is_empty() {
        output::note("No trades yet.");
        return Ok(());
    }
    output::table(trades.iter().map(TradeRow::from));
    Ok(())
}

/// Execute `portfolio reset`. Refuses unless confirmed with `--yes`.
pub async fn execute_reset(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        return Err(ConfigError::Other(
            "refusing to reset the portfolio without --yes".to_string(),
        )
        .into());
    }

    let portfolio = build_portfolio(config)?;
    portfolio.reset().await?;

    if output::is_json() {
        output::json_output(json!({ "command": "portfolio.reset", "reset": true }));
        return Ok(());
    }
    output::success("Portfolio reset");
    Ok(())
}
