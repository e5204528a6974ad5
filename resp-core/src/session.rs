//! # Session Result Store
//!
//! Hands exactly one [`InferenceResult`] from the upload flow to the results
//! flow without a durable database.
//!
//! A [`SessionScope`] owns the storage for one session. Both flows receive a
//! [`ResultHandoff`] capability cloned from the scope; dropping the scope ends
//! the session and clears whatever was handed off.

use crate::InferenceResult;
use crate::error::RetrievalError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The single well-known key the result is stored under.
pub const RESULT_KEY: &str = "resp-ai:lastResult";

/// Scoped string key/value storage backing the handoff.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
    fn clear(&self);
}

/// Process-local storage that lives as long as its session scope.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Every critical section is a single map call, so poisoning is harmless.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items().insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.items().remove(key);
    }

    fn clear(&self) {
        self.items().clear();
    }
}

/// Owns the storage for one session and clears it when dropped.
pub struct SessionScope {
    storage: Arc<dyn SessionStorage>,
}

impl SessionScope {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        tracing::debug!("session scope opened");
        Self { storage }
    }

    /// A handoff capability for a flow inside this session.
    pub fn handoff(&self) -> ResultHandoff {
        ResultHandoff {
            storage: Arc::clone(&self.storage),
        }
    }

    /// Direct access to the backing storage.
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }
}

impl Default for SessionScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        self.storage.clear();
        tracing::debug!("session scope closed");
    }
}

/// Typed single-writer / single-reader handoff of the inference result.
#[derive(Clone)]
pub struct ResultHandoff {
    storage: Arc<dyn SessionStorage>,
}

impl ResultHandoff {
    /// Stores the result as JSON, replacing any earlier one.
    pub fn put(&self, result: &InferenceResult) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(result)?;
        self.storage.set_item(RESULT_KEY, json);
        tracing::info!(label = %result.predicted_label, "analysis result handed off");
        Ok(())
    }

    /// Reads the stored result without removing it.
    pub fn get(&self) -> Result<InferenceResult, RetrievalError> {
        let raw = self
            .storage
            .get_item(RESULT_KEY)
            .ok_or(RetrievalError::Absent)?;
        serde_json::from_str(&raw).map_err(|err| {
            tracing::warn!(error = %err, "stored analysis result is corrupt");
            RetrievalError::Corrupt
        })
    }

    /// Reads the stored result and removes it, so it is consumed once.
    pub fn take(&self) -> Result<InferenceResult, RetrievalError> {
        let outcome = self.get();
        if outcome.is_ok() {
            self.storage.remove_item(RESULT_KEY);
        }
        outcome
    }

    pub fn clear(&self) {
        self.storage.remove_item(RESULT_KEY);
    }
}
