//! Host-side session adapters for flashbag.
//!
//! Resolves which backing store a request's flash messages live in: a
//! managed session handle, a plain JSON container owned by the caller, or
//! the ambient request session.

pub mod ambient;
pub mod binding;
pub mod shared;

pub use ambient::AmbientSession;
pub use binding::{bind, open, open_flat, Backing, Storage};
pub use shared::SharedSession;
