//! Provide an [`ExecutionContext`] shared by every field resolution of a query.
//!
//! The context holds plain entries in a DashMap, which lets the host and user evaluators pass
//! data along the resolution, and the scoped metadata store that carries metadata from a resolved
//! value down to its descendant fields.

use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::configuration::ScopeTracking;
use crate::error::DecorateError;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::scoped::FlatScopedStore;
use crate::scoped::PathScopedStore;
use crate::scoped::ScopedMetadataStore;

/// Holds [`ExecutionContext`] entries.
pub(crate) type Entries = Arc<DashMap<String, Value>>;

/// Query scoped state.
///
/// Create one per query execution; clones share the same state.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    entries: Entries,
    scoped: Arc<dyn ScopedMetadataStore>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::with_scope_tracking(ScopeTracking::default())
    }

    pub fn with_scope_tracking(scope_tracking: ScopeTracking) -> Self {
        let scoped: Arc<dyn ScopedMetadataStore> = match scope_tracking {
            ScopeTracking::Path => Arc::new(PathScopedStore::new()),
            ScopeTracking::Flat => Arc::new(FlatScopedStore::new()),
        };
        Self::with_store(scoped)
    }

    /// Uses a custom scoped metadata store.
    pub fn with_store(scoped: Arc<dyn ScopedMetadataStore>) -> Self {
        ExecutionContext {
            entries: Default::default(),
            scoped,
        }
    }

    /// Reads the entry stored under `key` by the host or an earlier evaluator.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, DecorateError> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };
        serde_json_bytes::from_value(entry.value().clone())
            .map(Some)
            .map_err(|e| DecorateError::Context(e.into()))
    }

    /// Stores `value` under `key`, replacing the previous entry.
    pub fn insert<V: Serialize>(
        &self,
        key: impl Into<String>,
        value: V,
    ) -> Result<(), DecorateError> {
        let value =
            serde_json_bytes::to_value(value).map_err(|e| DecorateError::Context(e.into()))?;
        self.entries.insert(key.into(), value);
        Ok(())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets `key` for the field at `path` and every field below it.
    pub fn scoped_set<K: Into<String>>(&self, path: &Path, key: K, value: Value) {
        let key: String = key.into();
        let mut contributed = Object::new();
        contributed.insert(key, value);
        self.scoped.record(path, contributed);
    }

    /// Reads `key` as set at `path` or by its nearest ancestor.
    pub fn scoped_get(&self, path: &Path, key: &str) -> Option<Value> {
        self.scoped.inherited(path).get(key).cloned()
    }

    /// The scoped metadata visible at `path`.
    pub fn scoped_metadata(&self, path: &Path) -> Object {
        self.scoped.inherited(path)
    }

    pub(crate) fn record_scoped(&self, path: &Path, contributed: Object) -> Object {
        self.scoped.record(path, contributed)
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
