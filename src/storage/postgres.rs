use super::SlotStorage;
use crate::entity::TrackerError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// Slots kept in the `kv_slots` table (see `migrations/`)
pub struct PgSlotStorage {
    db_pool: Arc<PgPool>,
}

impl PgSlotStorage {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SlotStorage for PgSlotStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, TrackerError> {
        let row = sqlx::query("SELECT value FROM kv_slots WHERE key = $1")
            .bind(key)
            .fetch_optional(&*self.db_pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO kv_slots (key, value, updated_at) VALUES ($1, $2, $3)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&*self.db_pool)
        .await?;

        Ok(())
    }
}
