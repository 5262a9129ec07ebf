use async_trait::async_trait;
use chrono::Utc;
use course_core::model::ProgressRecord;
use sqlx::Row;

use crate::repository::{
    PROGRESS_STORE_KEY, ProgressRepository, StorageError, decode_record, encode_record,
};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query("SELECT value FROM progress_store WHERE key = ?1")
            .bind(PROGRESS_STORE_KEY)
            .fetch_optional(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        decode_record(&raw).map(Some)
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let encoded = encode_record(record)?;

        sqlx::query(
            r"
            INSERT INTO progress_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(PROGRESS_STORE_KEY)
        .bind(encoded)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
