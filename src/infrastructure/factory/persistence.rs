//! Persistence factory for the ledger and chat history.

use crate::adapter::outbound::sqlite::{open, DbPool, SqliteChatHistory, SqliteLedger};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Open the configured database, applying pending migrations.
///
/// # Errors
///
/// Returns an error if the file cannot be created or migrated.
pub fn open_database(config: &Config) -> Result<DbPool> {
    open(&config.database)
}

/// Ledger and chat history sharing one pool.
///
/// # Errors
///
/// See [`open_database`].
pub fn build_stores(config: &Config) -> Result<(SqliteLedger, SqliteChatHistory)> {
    let pool = open_database(config)?;
    Ok((SqliteLedger::new(pool.clone()), SqliteChatHistory::new(pool)))
}
