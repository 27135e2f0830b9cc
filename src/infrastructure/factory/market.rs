//! Market data factory.

use std::sync::Arc;

use crate::adapter::outbound::yahoo::YahooClient;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::market::MarketData;

/// Build the Yahoo Finance client.
#[must_use]
pub fn build_yahoo(config: &Config) -> YahooClient {
    YahooClient::from_config(&config.market_data)
}

/// Build the quote service behind the market data port.
#[must_use]
pub fn build_market_data(config: &Config) -> Arc<dyn MarketData> {
    Arc::new(build_yahoo(config))
}
