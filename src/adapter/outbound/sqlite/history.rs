//! SQLite chat history.

use chrono::Utc;
use diesel::prelude::*;

use super::database::connection::{DbConn, DbPool};
use super::database::model::{ChatRow, LastInsertRowId, NewChatRow};
use super::database::schema::chat_history;
use super::ledger::parse_timestamp;
use crate::domain::ChatEntry;
use crate::error::{Error, Result};
use crate::port::outbound::store::ChatHistory;

/// SQLite-backed [`ChatHistory`].
pub struct SqliteChatHistory {
    pool: DbPool,
}

impl SqliteChatHistory {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }
}

impl ChatHistory for SqliteChatHistory {
    async fn save(&self, query: &str, response: &str) -> Result<i32> {
        let mut conn = self.conn()?;
        let row = NewChatRow {
            query: query.to_string(),
            response: response.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let id = conn.transaction(|conn| {
            diesel::insert_into(chat_history::table)
                .values(&row)
                .execute(conn)?;

            diesel::sql_query("SELECT last_insert_rowid() AS id")
                .get_result::<LastInsertRowId>(conn)
                .map(|row| row.id)
        })?;

        Ok(id)
    }

    async fn list(&self) -> Result<Vec<ChatEntry>> {
        let mut conn = self.conn()?;
        let rows: Vec<ChatRow> = chat_history::table
            .select(ChatRow::as_select())
            .order(chat_history::id.asc())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| {
                Ok(ChatEntry {
                    id: row.id.unwrap_or_default(),
                    created_at: parse_timestamp(&row.created_at)?,
                    query: row.query,
                    response: row.response,
                })
            })
            .collect()
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(chat_history::table.filter(chat_history::id.eq(id)))
            .execute(&mut conn)?;
        Ok(deleted > 0)
    }

    async fn clear(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        Ok(diesel::delete(chat_history::table).execute(&mut conn)?)
    }
}
