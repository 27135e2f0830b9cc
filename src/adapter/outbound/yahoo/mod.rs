//! Yahoo Finance market data adapter.

mod client;
pub mod dto;
pub mod mock;

pub use client::YahooClient;
