//! Handler for the `quote` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::Ticker;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::market::build_yahoo;
use crate::port::outbound::market::MarketData;

/// Accept `TCS`, `tcs.ns` or `TCS.NS`.
fn parse_ticker(raw: &str, suffix: &str) -> Result<Ticker> {
    let ticker = if raw.contains('.') {
        Ticker::parse(raw, suffix)?
    } else {
        Ticker::from_symbol(raw, suffix)?
    };
    Ok(ticker)
}

fn number(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}

/// Yahoo reports ratios such as ROE as fractions.
fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Market cap in crores of rupees, the unit Indian listings are quoted in.
fn crores(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.0} Cr", v / 1e7))
}

/// Execute `quote`.
pub async fn execute(config: &Config, raw: &str) -> Result<()> {
    let ticker = parse_ticker(raw, &config.trading.exchange_suffix)?;
    let yahoo = build_yahoo(config);

    let pb = output::spinner(&format!("Fetching {ticker}"));
    let quote = yahoo.quote(&ticker).await;
    let fundamentals = yahoo.fundamentals(&ticker).await;
    let technicals = yahoo.technicals(&ticker).await;
    pb.finish_and_clear();

    // The quote itself must succeed; the extras degrade to warnings.
    let quote = quote?;
    let fundamentals = fundamentals.unwrap_or_else(|err| {
        output::warning(&format!("fundamentals unavailable: {err}"));
        Default::default()
    });
    let technicals = technicals.unwrap_or_else(|err| {
        output::warning(&format!("technicals unavailable: {err}"));
        Default::default()
    });

    if output::is_json() {
        output::json_output(json!({
            "command": "quote",
            "quote": quote,
            "fundamentals": fundamentals,
            "technicals": technicals,
        }));
        return Ok(());
    }

    output::section(&format!(
        "{} {}",
        output::highlight(&ticker),
        fundamentals.name.as_deref().unwrap_or_default()
    ));
    output::field(
        "Live price",
        match quote.price {
            Some(price) => format!(
                "{:.2} {}",
                price.round_dp(2),
                quote.currency.as_deref().unwrap_or_default()
            ),
            None => format!("Could not fetch live price for {ticker}"),
        },
    );
    if let Some(sector) = &fundamentals.sector {
        output::field("Sector", sector);
    }
    if let Some(industry) = &fundamentals.industry {
        output::field("Industry", industry);
    }

    output::section("Fundamentals");
    output::field("Market cap", crores(fundamentals.market_cap));
    output::field("P/E", number(fundamentals.pe, 2));
    output::field("P/B", number(fundamentals.pb, 2));
    output::field("ROE", percent(fundamentals.roe));
    output::field("Debt/Equity", number(fundamentals.debt_to_equity, 2));
    output::field("EPS", number(fundamentals.eps, 2));

    output::section("Technicals");
    output::field("RSI (14)", number(technicals.rsi, 2));
    output::field("50 DMA", number(technicals.dma_50, 2));
    output::field("200 DMA", number(technicals.dma_200, 2));
    output::field("Last close", number(technicals.last_price, 2));
    Ok(())
}
