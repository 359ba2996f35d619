use serde::{Deserialize, Serialize};

use crate::error::{FlashError, Result};

/// Reserved key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "slimFlash";

/// Flash store configuration.
///
/// Loaded from the host's config as JSON, e.g. `{ "storage_key": "flash" }`.
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    /// Key inside the backing store under which both generations live.
    /// Must not collide with the host's other session keys.
    pub storage_key: String,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl FlashConfig {
    pub fn new(storage_key: impl Into<String>) -> Result<Self> {
        let config = Self {
            storage_key: storage_key.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(FlashError::InvalidStorageKey);
        }
        Ok(())
    }
}
