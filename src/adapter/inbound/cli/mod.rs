//! CLI module graph.

pub mod ask;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod history;
pub mod kb;
pub mod output;
pub mod portfolio;
pub mod quote;
pub mod run;
pub mod scrape;
