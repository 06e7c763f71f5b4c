//! Durable local state for Chirp.
//!
//! Two stores sit on top of one string-keyed file store: the session
//! (bearer token plus the identity decoded from it) and the liked-set
//! (which thoughts this device has hearted). Both follow the same
//! tolerance rule: failing to load saved state degrades to a fresh
//! start with a warning, never a crash. Writes are atomic.

mod atomic;
mod kv;
mod liked;
mod session;

pub use kv::{FileStore, StoreError};
pub use liked::LikedStore;
pub use session::SessionStore;
