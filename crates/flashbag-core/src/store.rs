use serde_json::{Map, Value};

/// Session store trait: key-value storage for flash generations.
///
/// The flash buffer only ever touches one reserved key, so this is the whole
/// contract it needs from a backing store. Plain maps and richer session
/// managers are both adapted to it at the boundary.
///
/// Implementations: `serde_json::Map` (plain), shared/locked session handles,
/// framework session adapters, test fakes.
pub trait SessionStore {
    /// Read the value stored under key. Returns None if not found.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value under key, replacing whatever was there.
    fn set(&mut self, key: &str, value: Value);
}

impl SessionStore for Map<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        Map::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        (**self).set(key, value);
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        (**self).set(key, value);
    }
}

/// Name of a JSON value's kind, for diagnostics.
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
