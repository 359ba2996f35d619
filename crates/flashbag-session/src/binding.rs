use flashbag_core::store::shape_name;
use flashbag_core::{FlashConfig, FlashError, FlatMessages, Messages, Result, SessionStore};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ambient::AmbientSession;
use crate::shared::SharedSession;

/// A backing store handed in by the host.
pub enum Storage<'a> {
    /// A session manager exposing only `get`/`set`.
    Managed(&'a mut dyn SessionStore),
    /// A plain container. Must be an object or an array; `null` counts as
    /// no store at all.
    Value(&'a mut Value),
}

/// The store a flash instance ended up bound to.
pub enum Backing<'a> {
    /// Live reference into the caller's container.
    Plain(&'a mut Map<String, Value>),
    Managed(&'a mut dyn SessionStore),
    /// The ambient request session.
    Ambient(SharedSession),
}

impl SessionStore for Backing<'_> {
    fn get(&self, key: &str) -> Option<Value> {
        match self {
            Backing::Plain(map) => (**map).get(key).cloned(),
            Backing::Managed(store) => store.get(key),
            Backing::Ambient(session) => session.get(key),
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        match self {
            Backing::Plain(map) => {
                map.insert(key.to_string(), value);
            }
            Backing::Managed(store) => store.set(key, value),
            Backing::Ambient(session) => session.set(key, value),
        }
    }
}

/// Resolve the backing store for one request.
///
/// Resolution order: a managed store, then a plain container, then the
/// ambient session. Arrays are turned into objects keyed by index so that
/// the reserved key can live alongside their elements.
pub fn bind<'a>(storage: Option<Storage<'a>>, ambient: &AmbientSession) -> Result<Backing<'a>> {
    match storage {
        Some(Storage::Managed(store)) => {
            debug!("flash bound to managed store");
            Ok(Backing::Managed(store))
        }
        Some(Storage::Value(value)) if value.is_null() => bind_ambient(ambient),
        Some(Storage::Value(value)) => {
            if let Value::Array(items) = &mut *value {
                let map = std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item))
                    .collect();
                *value = Value::Object(map);
            }
            match value {
                Value::Object(map) => {
                    debug!("flash bound to plain container");
                    Ok(Backing::Plain(map))
                }
                other => Err(FlashError::InvalidStorageShape {
                    found: shape_name(other),
                }),
            }
        }
        None => bind_ambient(ambient),
    }
}

fn bind_ambient<'a>(ambient: &AmbientSession) -> Result<Backing<'a>> {
    let session = ambient.session().ok_or(FlashError::SessionUnavailable)?;
    debug!("flash bound to ambient session");
    Ok(Backing::Ambient(session.clone()))
}

/// Build keyed flash messages for this request.
pub fn open<'a>(
    storage: Option<Storage<'a>>,
    ambient: &AmbientSession,
    config: &FlashConfig,
) -> Result<Messages<Backing<'a>>> {
    config.validate()?;
    let backing = bind(storage, ambient)?;
    Ok(Messages::with_config(backing, config))
}

/// Build flat flash messages for this request.
pub fn open_flat<'a>(
    storage: Option<Storage<'a>>,
    ambient: &AmbientSession,
    config: &FlashConfig,
) -> Result<FlatMessages<Backing<'a>>> {
    config.validate()?;
    let backing = bind(storage, ambient)?;
    Ok(FlatMessages::with_config(backing, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_binds_plain() {
        let mut value = json!({ "user": "ada" });
        let backing = bind(Some(Storage::Value(&mut value)), &AmbientSession::uninitialized());
        assert!(matches!(backing, Ok(Backing::Plain(_))));
    }

    #[test]
    fn array_promoted_to_object() {
        let mut value = json!(["a", "b"]);
        let mut backing =
            bind(Some(Storage::Value(&mut value)), &AmbientSession::uninitialized()).unwrap();
        backing.set("slimFlash", json!({}));
        drop(backing);
        assert_eq!(value, json!({ "0": "a", "1": "b", "slimFlash": {} }));
    }

    #[test]
    fn scalar_rejected() {
        let mut value = json!("session");
        let result = bind(Some(Storage::Value(&mut value)), &AmbientSession::uninitialized());
        assert!(matches!(
            result,
            Err(FlashError::InvalidStorageShape { found: "string" })
        ));

        let mut value = json!(7);
        let result = bind(Some(Storage::Value(&mut value)), &AmbientSession::uninitialized());
        assert!(matches!(
            result,
            Err(FlashError::InvalidStorageShape { found: "number" })
        ));
    }

    #[test]
    fn null_falls_back_to_ambient() {
        let mut value = Value::Null;
        let result = bind(Some(Storage::Value(&mut value)), &AmbientSession::uninitialized());
        assert!(matches!(result, Err(FlashError::SessionUnavailable)));

        let mut ambient = AmbientSession::uninitialized();
        ambient.start();
        let mut value = Value::Null;
        let result = bind(Some(Storage::Value(&mut value)), &ambient);
        assert!(matches!(result, Ok(Backing::Ambient(_))));
    }

    #[test]
    fn missing_store_without_session_fails() {
        let result = bind(None, &AmbientSession::uninitialized());
        assert!(matches!(result, Err(FlashError::SessionUnavailable)));
    }

    #[test]
    fn managed_preferred() {
        let mut session = SharedSession::new();
        let result = bind(
            Some(Storage::Managed(&mut session)),
            &AmbientSession::uninitialized(),
        );
        assert!(matches!(result, Ok(Backing::Managed(_))));
    }

    #[test]
    fn open_rejects_empty_key() {
        let mut ambient = AmbientSession::uninitialized();
        ambient.start();
        let config = FlashConfig {
            storage_key: String::new(),
        };
        assert!(matches!(
            open(None, &ambient, &config),
            Err(FlashError::InvalidStorageKey)
        ));
    }
}
