//! Outbound adapters (driven side).

pub mod archive;
pub mod embedding;
pub mod llm;
pub mod screener;
pub mod sqlite;
pub mod yahoo;
