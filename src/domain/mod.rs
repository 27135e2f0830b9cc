//! Exchange-agnostic domain types: tickers, trades, holdings, scraped
//! company records and market snapshots.

mod chat;
mod company;
mod market;
mod money;
mod position;
mod ticker;
mod trade;

pub use chat::ChatEntry;
pub use company::{CompanyData, FinancialTable, FinancialValue, NewsItem, Ratio, ScrapeMetadata, TableRow};
pub use market::{rsi, sma, Fundamentals, Quote, Technicals, LONG_MA_WINDOW, RSI_PERIOD, SHORT_MA_WINDOW};
pub use money::{Price, Quantity};
pub use position::{Holding, PositionStatus};
pub use ticker::{is_valid_symbol, Ticker, NSE_SUFFIX};
pub use trade::{Execution, TradeAction, TradeInstruction, TradeRecord};
