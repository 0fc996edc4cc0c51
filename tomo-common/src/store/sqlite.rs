//! SQLite slot backend
//!
//! Slots live in the `local_storage` table created by
//! [`crate::db::init_database`].

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::SlotBackend;
use crate::Result;

#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SlotBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn read(&self, slot: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM local_storage WHERE key = ?")
                .bind(slot)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn write(&self, slot: &str, contents: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(slot)
        .bind(contents)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
