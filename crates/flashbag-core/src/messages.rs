use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::FlashConfig;
use crate::store::{shape_name, SessionStore};

/// One generation of keyed flash messages: key → messages in write order.
///
/// Keys keep the order in which they were first written.
pub type Generation = IndexMap<String, Vec<Value>>;

/// Keyed flash messages bound to a session store.
///
/// Construct one per request. Construction moves whatever the previous
/// request wrote under the reserved key into a read-only snapshot and resets
/// the key to an empty object. Writes go straight into the store, so they
/// become the snapshot of the *next* construction against the same store and
/// are never visible through this instance.
pub struct Messages<S: SessionStore> {
    store: S,
    storage_key: String,
    from_previous: Generation,
}

impl<S: SessionStore> Messages<S> {
    /// Bind to `store` using the default reserved key.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &FlashConfig::default())
    }

    pub fn with_config(mut store: S, config: &FlashConfig) -> Self {
        let storage_key = config.storage_key.clone();
        let from_previous = match store.get(&storage_key) {
            None | Some(Value::Null) => Generation::new(),
            Some(value) => parse_generation(value).unwrap_or_else(|found| {
                warn!(key = %storage_key, found, "discarding malformed flash data");
                Generation::new()
            }),
        };
        store.set(&storage_key, Value::Object(Map::new()));
        debug!(
            key = %storage_key,
            keys = from_previous.len(),
            "loaded flash messages from previous request"
        );
        Self {
            store,
            storage_key,
            from_previous,
        }
    }

    /// Queue `message` under `key` for the next request.
    ///
    /// Messages under the same key accumulate in call order. The store is
    /// updated before this returns.
    pub fn add_message(&mut self, key: impl Into<String>, message: impl Into<Value>) {
        let mut live = match self.store.get(&self.storage_key) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let message = message.into();
        match live.entry(key).or_insert_with(|| Value::Array(Vec::new())) {
            Value::Array(list) => list.push(message),
            bare => {
                let prior = bare.take();
                *bare = Value::Array(vec![prior, message]);
            }
        }
        self.store.set(&self.storage_key, Value::Object(live));
    }

    /// Messages flashed by the previous request.
    pub fn messages(&self) -> &Generation {
        &self.from_previous
    }

    /// Messages flashed under `key` by the previous request, or `None` if the
    /// key was never written.
    pub fn message(&self, key: &str) -> Option<&[Value]> {
        self.from_previous.get(key).map(Vec::as_slice)
    }

    pub fn has_message(&self, key: &str) -> bool {
        self.from_previous.contains_key(key)
    }

    /// The earliest message flashed under `key`.
    pub fn first_message(&self, key: &str) -> Option<&Value> {
        self.message(key)?.first()
    }

    /// Messages queued so far for the next request, read back from the store.
    pub fn pending(&self) -> Generation {
        self.store
            .get(&self.storage_key)
            .and_then(|value| parse_generation(value).ok())
            .unwrap_or_default()
    }

    /// Drop everything queued for the next request.
    pub fn clear_pending(&mut self) {
        self.store.set(&self.storage_key, Value::Object(Map::new()));
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Read a keyed generation out of a stored value.
///
/// Returns the value's shape name if it is neither an object nor an array.
/// An array is read as an object keyed by index (`"0"`, `"1"`, ...). A bare
/// entry (written without the list wrapper) is read as a one-element list.
fn parse_generation(value: Value) -> Result<Generation, &'static str> {
    let entries: Vec<(String, Value)> = match value {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        other => return Err(shape_name(&other)),
    };
    let mut generation = Generation::new();
    for (key, entry) in entries {
        let list = match entry {
            Value::Array(list) => list,
            Value::Null => continue,
            bare => {
                debug!(key = %key, "lifting bare flash entry into a list");
                vec![bare]
            }
        };
        generation.insert(key, list);
    }
    Ok(generation)
}
