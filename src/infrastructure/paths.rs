//! Path utilities for quantfolio.
//!
//! All data lives under `~/.quantfolio/`:
//! - `~/.quantfolio/config.toml` - main configuration
//! - `~/.quantfolio/quantfolio.db` - portfolio ledger and chat history
//! - `~/.quantfolio/scraped_data/` - scraped company records

use std::path::PathBuf;

/// Returns the quantfolio home directory (`~/.quantfolio/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quantfolio")
}

/// Returns the default config file path (`~/.quantfolio/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.quantfolio/quantfolio.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("quantfolio.db")
}

/// Returns the default scraped data directory (`~/.quantfolio/scraped_data/`).
pub fn default_data_dir() -> PathBuf {
    home_dir().join("scraped_data")
}

/// Ensures the quantfolio home directory exists.
pub fn ensure_home_dir() -> std::io::Result<()> {
    std::fs::create_dir_all(home_dir())
}
