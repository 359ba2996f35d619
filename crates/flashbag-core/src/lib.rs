//! Flash messages: notes written during one request that are readable during
//! the next request only.
//!
//! A [`Messages`] is built once per request over a [`SessionStore`]. It
//! snapshots what the previous request left under the reserved key, clears
//! the key, and writes new messages straight back into the store.

pub mod config;
pub mod error;
pub mod flat;
pub mod messages;
pub mod store;

pub use config::{FlashConfig, DEFAULT_STORAGE_KEY};
pub use error::{FlashError, Result};
pub use flat::FlatMessages;
pub use messages::{Generation, Messages};
pub use store::SessionStore;
