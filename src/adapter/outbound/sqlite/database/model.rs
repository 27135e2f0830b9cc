//! Database model types for Diesel ORM.
//!
//! Prices are stored as decimal strings so that average costs survive a
//! round trip exactly.

use diesel::prelude::*;

use super::schema::{chat_history, holdings, trades};

/// Database row for a holding.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingRow {
    pub ticker: String,
    pub quantity: i64,
    pub avg_price: String,
    pub updated_at: String,
}

/// Database row for a trade (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = trades)]
pub struct NewTradeRow {
    pub ticker: String,
    pub action: String,
    pub quantity: i64,
    pub price: String,
    pub executed_at: String,
}

/// Database row for a trade (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeRow {
    pub id: Option<i32>,
    pub ticker: String,
    pub action: String,
    pub quantity: i64,
    pub price: String,
    pub executed_at: String,
}

/// Database row for a chat entry (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = chat_history)]
pub struct NewChatRow {
    pub query: String,
    pub response: String,
    pub created_at: String,
}

/// Database row for a chat entry (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = chat_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChatRow {
    pub id: Option<i32>,
    pub query: String,
    pub response: String,
    pub created_at: String,
}

/// Helper struct for querying `last_insert_rowid()`.
#[derive(QueryableByName, Debug)]
pub struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub id: i32,
}
