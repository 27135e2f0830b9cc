//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (LLM providers, databases, market data, scraped websites).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │   LLM   │            │   Ledger    │              │  Market   │
//! │ Adapter │            │   (SQLite)  │              │   Data    │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;
