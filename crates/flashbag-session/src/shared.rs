use std::sync::{Arc, Mutex, MutexGuard};

use flashbag_core::SessionStore;
use serde_json::{Map, Value};

/// A cloneable handle to one session's key-value data.
///
/// This is the managed store shape: callers only see `get`/`set`, never the
/// map itself. Clones share the same data, so the host can keep one handle
/// while a flash store writes through another.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Map<String, Value>>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    /// Copy of the current session data.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.lock().clone()
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().remove(key)
    }

    /// Whether both handles point at the same session.
    pub fn same_session(&self, other: &SharedSession) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Poisoning is ignored: a `set` either landed or it didn't.
    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for SharedSession {
    fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.lock().insert(key.to_string(), value);
    }
}
