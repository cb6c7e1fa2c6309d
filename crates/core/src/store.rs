//! Key-value persistence boundary.
//!
//! The pipeline never talks to a storage medium directly. Every long-lived
//! structure is written as one JSON document under a stable [`StoreKey`], and
//! reads that fail or return garbage are treated as "absent".

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::StoreError;

/// Stable keys for the four persisted documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    ModelWeights,
    UserProfile,
    FeedbackHistory,
    WeatherHistory,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::ModelWeights,
        StoreKey::UserProfile,
        StoreKey::FeedbackHistory,
        StoreKey::WeatherHistory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::ModelWeights => "ml_model_weights",
            StoreKey::UserProfile => "user_outfit_profile",
            StoreKey::FeedbackHistory => "user_feedback_history",
            StoreKey::WeatherHistory => "weather_historical_data",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injected persistence collaborator.
///
/// Implementations must write each document atomically: a reader sees either
/// the previous payload or the new one, never a mix.
pub trait PreferenceStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;
    fn set(&self, key: StoreKey, payload: &str) -> Result<(), StoreError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, payload: &str) -> Result<(), StoreError> {
        (**self).set(key, payload)
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, payload: &str) -> Result<(), StoreError> {
        (**self).set(key, payload)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<HashMap<StoreKey, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw payload, bypassing serialization. Handy for corrupt-data tests.
    pub fn with_document(self, key: StoreKey, payload: impl Into<String>) -> Self {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(key, payload.into());
        }
        self
    }
}

impl PreferenceStore for InMemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock is poisoned".to_owned()))?;
        Ok(documents.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, payload: &str) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock is poisoned".to_owned()))?;
        documents.insert(key, payload.to_owned());
        Ok(())
    }
}

/// Reads and decodes a document. Missing, unreadable and corrupt documents all
/// come back as `None`; the cause is logged.
pub fn load_document<T: DeserializeOwned>(store: &dyn PreferenceStore, key: StoreKey) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(event_name = "store.document.absent", store_key = %key, "no stored document");
            return None;
        }
        Err(error) => {
            warn!(
                event_name = "store.document.read_failed",
                store_key = %key,
                error = %error,
                "falling back to defaults after store read failure"
            );
            return None;
        }
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(document) => Some(document),
        Err(error) => {
            warn!(
                event_name = "store.document.corrupt",
                store_key = %key,
                error = %error,
                "ignoring corrupt stored document"
            );
            None
        }
    }
}

pub fn save_document<T: Serialize + ?Sized>(
    store: &dyn PreferenceStore,
    key: StoreKey,
    document: &T,
) -> Result<(), StoreError> {
    let payload =
        serde_json::to_string(document).map_err(|error| StoreError::Serialization(error.to_string()))?;
    store.set(key, &payload)
}

/// Best-effort write: failures are logged and swallowed so in-memory state stays
/// authoritative for the rest of the session. Returns whether the write landed.
pub fn persist_or_warn<T: Serialize + ?Sized>(
    store: &dyn PreferenceStore,
    key: StoreKey,
    document: &T,
) -> bool {
    match save_document(store, key, document) {
        Ok(()) => true,
        Err(error) => {
            warn!(
                event_name = "store.document.write_failed",
                store_key = %key,
                error = %error,
                "continuing with in-memory state after store write failure"
            );
            false
        }
    }
}
