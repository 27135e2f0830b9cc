//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] drives the application (the command line).
//! - [`outbound`] is driven by it (LLM providers, SQLite, Yahoo Finance,
//!   screener.in, the JSON archive and the embedder).

pub mod inbound;
pub mod outbound;
