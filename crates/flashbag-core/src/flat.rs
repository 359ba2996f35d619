use std::fmt::Display;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::FlashConfig;
use crate::store::{shape_name, SessionStore};

/// Flat flash messages: one ordered list of text, no per-key lookup.
///
/// Same generation rules as [`crate::Messages`], but the reserved key holds a
/// JSON array of strings instead of an object of lists. The two layouts are
/// not interchangeable; each reads the other's data as malformed (empty).
pub struct FlatMessages<S: SessionStore> {
    store: S,
    storage_key: String,
    from_previous: Vec<String>,
}

impl<S: SessionStore> FlatMessages<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &FlashConfig::default())
    }

    pub fn with_config(mut store: S, config: &FlashConfig) -> Self {
        let storage_key = config.storage_key.clone();
        let from_previous = match store.get(&storage_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => parse_list(value).unwrap_or_else(|found| {
                warn!(key = %storage_key, found, "discarding malformed flash data");
                Vec::new()
            }),
        };
        store.set(&storage_key, Value::Array(Vec::new()));
        debug!(
            key = %storage_key,
            messages = from_previous.len(),
            "loaded flash messages from previous request"
        );
        Self {
            store,
            storage_key,
            from_previous,
        }
    }

    /// Queue `message`, as text, for the next request.
    pub fn add_message(&mut self, message: impl Display) {
        let mut live = match self.store.get(&self.storage_key) {
            Some(Value::Array(list)) => list,
            _ => Vec::new(),
        };
        live.push(Value::String(message.to_string()));
        self.store.set(&self.storage_key, Value::Array(live));
    }

    /// Messages flashed by the previous request, in write order.
    pub fn messages(&self) -> &[String] {
        &self.from_previous
    }

    pub fn pending(&self) -> Vec<String> {
        self.store
            .get(&self.storage_key)
            .and_then(|value| parse_list(value).ok())
            .unwrap_or_default()
    }

    pub fn clear_pending(&mut self) {
        self.store.set(&self.storage_key, Value::Array(Vec::new()));
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Non-string items are kept in their JSON text form.
fn parse_list(value: Value) -> Result<Vec<String>, &'static str> {
    let Value::Array(items) = value else {
        return Err(shape_name(&value));
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => text,
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn saved_then_updated() {
        let mut store = Map::new();
        {
            let mut flash = FlatMessages::new(&mut store);
            flash.add_message("saved");
            flash.add_message("updated");
            assert!(flash.messages().is_empty());
        }
        let flash = FlatMessages::new(&mut store);
        assert_eq!(flash.messages(), ["saved", "updated"]);
    }

    #[test]
    fn coerces_to_text() {
        let mut store = Map::new();
        FlatMessages::new(&mut store).add_message(404);
        store
            .get_mut("slimFlash")
            .and_then(Value::as_array_mut)
            .unwrap()
            .push(json!(true));
        let flash = FlatMessages::new(&mut store);
        assert_eq!(flash.messages(), ["404", "true"]);
    }

    #[test]
    fn keyed_layout_reads_as_empty() {
        let mut store = Map::new();
        store.insert("slimFlash".into(), json!({ "error": ["x"] }));
        let flash = FlatMessages::new(&mut store);
        assert!(flash.messages().is_empty());
        drop(flash);
        assert_eq!(store.get("slimFlash"), Some(&json!([])));
    }

    #[test]
    fn expires_after_one_generation() {
        let mut store = Map::new();
        FlatMessages::new(&mut store).add_message("x");
        assert_eq!(FlatMessages::new(&mut store).messages(), ["x"]);
        assert!(FlatMessages::new(&mut store).messages().is_empty());
    }

    #[test]
    fn pending_and_clear() {
        let mut store = Map::new();
        let mut flash = FlatMessages::new(&mut store);
        flash.add_message("a");
        assert_eq!(flash.pending(), vec!["a".to_string()]);
        flash.clear_pending();
        assert!(flash.pending().is_empty());
    }
}
