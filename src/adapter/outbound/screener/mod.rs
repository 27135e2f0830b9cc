//! screener.in fundamentals scraper.
//!
//! [`ScreenerClient`] fetches company pages; the parsing functions are
//! pure and can be used on saved HTML.

mod client;
pub mod mock;
pub mod news;
pub mod parse;
pub mod value;

pub use client::ScreenerClient;
pub use parse::parse_company;
pub use value::clean_financial_value;
