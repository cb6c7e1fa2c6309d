//! Blocking [`PreferenceStore`] backed by SQLite.

use attire_core::errors::StoreError;
use attire_core::store::{PreferenceStore, StoreKey};
use sqlx::migrate::MigrateError;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

use crate::connection::connect_with_settings;
use crate::migrations::run_pending;
use crate::repositories::{DocumentRepository, RepositoryError, SqlDocumentRepository, StoredDocument};

#[derive(Debug, Error)]
pub enum StoreBackendError {
    #[error("failed to start storage runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migration(#[from] MigrateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<StoreBackendError> for StoreError {
    fn from(error: StoreBackendError) -> Self {
        match error {
            StoreBackendError::Runtime(_) | StoreBackendError::Connect(_) => {
                StoreError::Unavailable(error.to_string())
            }
            StoreBackendError::Repository(RepositoryError::Decode(message)) => {
                StoreError::Serialization(message)
            }
            StoreBackendError::Migration(_) | StoreBackendError::Repository(_) => {
                StoreError::Backend(error.to_string())
            }
        }
    }
}

/// Owns a current-thread runtime and blocks on every query, so callers keep a
/// synchronous store. Must not be used from inside another tokio runtime.
pub struct SqlitePreferenceStore {
    repository: SqlDocumentRepository,
    runtime: Runtime,
}

impl SqlitePreferenceStore {
    /// Connects and applies pending migrations.
    pub fn open(
        database_url: &str,
        max_connections: u32,
        timeout_secs: u64,
    ) -> Result<Self, StoreBackendError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let pool = runtime
            .block_on(connect_with_settings(database_url, max_connections, timeout_secs))
            .map_err(StoreBackendError::Connect)?;
        runtime.block_on(run_pending(&pool))?;

        tracing::debug!(
            event_name = "storage.sqlite.opened",
            max_connections,
            "sqlite preference store ready"
        );

        Ok(Self { repository: SqlDocumentRepository::new(pool), runtime })
    }

    /// Every stored document, ordered by key.
    pub fn documents(&self) -> Result<Vec<StoredDocument>, StoreBackendError> {
        Ok(self.runtime.block_on(self.repository.list())?)
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let document = self
            .runtime
            .block_on(self.repository.find(key.as_str()))
            .map_err(StoreBackendError::from)?;
        Ok(document.map(|document| document.payload))
    }

    fn set(&self, key: StoreKey, payload: &str) -> Result<(), StoreError> {
        self.runtime
            .block_on(self.repository.upsert(key.as_str(), payload))
            .map_err(StoreBackendError::from)?;
        Ok(())
    }
}

impl Drop for SqlitePreferenceStore {
    fn drop(&mut self) {
        self.runtime.block_on(self.repository.pool().close());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_surface_as_serialization_errors() {
        let error: StoreError =
            StoreBackendError::Repository(RepositoryError::Decode("bad timestamp".to_owned())).into();
        assert_eq!(error, StoreError::Serialization("bad timestamp".to_owned()));
    }

    #[test]
    fn connection_failures_surface_as_unavailable() {
        let error: StoreError = StoreBackendError::Connect(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(error, StoreError::Unavailable(_)));
    }

    #[test]
    fn in_memory_database_round_trips_documents() {
        let store = SqlitePreferenceStore::open("sqlite::memory:", 1, 5).expect("open store");

        assert_eq!(store.get(StoreKey::ModelWeights), Ok(None));
        store.set(StoreKey::ModelWeights, r#"{"top_5_0":1.1}"#).expect("write");
        assert_eq!(store.get(StoreKey::ModelWeights), Ok(Some(r#"{"top_5_0":1.1}"#.to_owned())));
        assert_eq!(store.documents().expect("list").len(), 1);
    }
}
