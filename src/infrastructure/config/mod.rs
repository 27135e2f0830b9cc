//! Infrastructure configuration modules.

pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod market;
pub mod scraper;
pub mod settings;
pub mod trading;
