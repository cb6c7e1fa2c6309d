use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod document;

pub use document::SqlDocumentRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// One persisted JSON document keyed by its store key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub key: String,
    pub payload: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find(&self, key: &str) -> Result<Option<StoredDocument>, RepositoryError>;

    /// Replaces the whole document in a single statement.
    async fn upsert(&self, key: &str, payload: &str) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<StoredDocument>, RepositoryError>;
}
