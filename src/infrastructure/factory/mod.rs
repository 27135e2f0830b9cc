//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured infrastructure
//! components from application configuration. These factories handle
//! dependency injection and wiring.
//!
//! # Submodules
//!
//! - [`llm`] - LLM client construction
//! - [`market`] - Quote service construction
//! - [`persistence`] - Database, ledger and chat history construction
//! - [`research`] - Scraper, knowledge base and assistant construction

pub mod llm;
pub mod market;
pub mod persistence;
pub mod research;

#[cfg(test)]
mod tests;
