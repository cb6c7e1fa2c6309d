pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use connection::{connect_with_settings, DbPool};
pub use repositories::{DocumentRepository, RepositoryError, SqlDocumentRepository, StoredDocument};
pub use store::{SqlitePreferenceStore, StoreBackendError};
