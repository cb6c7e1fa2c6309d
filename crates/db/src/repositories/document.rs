use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use super::{DocumentRepository, RepositoryError, StoredDocument};
use crate::DbPool;

pub struct SqlDocumentRepository {
    pool: DbPool,
}

impl SqlDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn row_to_document(row: &SqliteRow) -> Result<StoredDocument, RepositoryError> {
    let key: String = row.try_get("key").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let payload: String =
        row.try_get("payload").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let updated_at_str: String =
        row.try_get("updated_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("updated_at for `{key}`: {e}")))?;

    Ok(StoredDocument { key, payload, updated_at })
}

#[async_trait::async_trait]
impl DocumentRepository for SqlDocumentRepository {
    async fn find(&self, key: &str) -> Result<Option<StoredDocument>, RepositoryError> {
        let row = sqlx::query(
            "SELECT key, payload, updated_at FROM preference_document WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn upsert(&self, key: &str, payload: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO preference_document (key, payload, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT key, payload, updated_at FROM preference_document ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }
}
