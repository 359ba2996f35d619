use thiserror::Error;

/// Errors raised while configuring or binding a flash store.
///
/// Message operations themselves never fail; everything here is detected
/// once, before the first message is read or written.
#[derive(Debug, Error)]
pub enum FlashError {
    #[error("flash messages unavailable: no store supplied and no session started")]
    SessionUnavailable,

    #[error("flash storage must be an object or an array, found {found}")]
    InvalidStorageShape { found: &'static str },

    #[error("flash storage key must not be empty")]
    InvalidStorageKey,

    #[error("invalid flash config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlashError>;
