//! Past assistant queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A saved query and (optionally) the answer it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
    pub id: i32,
    pub query: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}
