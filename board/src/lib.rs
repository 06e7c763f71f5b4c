//! The thought board: client core for a small social message wall.
//!
//! [`ThoughtBoard`] owns the canonical in-memory copy of the remote
//! thought list and every way it changes: wholesale refresh, posting,
//! liking, editing, deleting, plus the session and the device's
//! liked-set. Rendering layers read snapshots; they never mutate.
//!
//! The interesting contract is the mutation protocol. Likes are
//! optimistic and never rolled back; everything else confirms with the
//! server before touching the list. See [`ThoughtBoard`] for the rules
//! and `chirp-api` for the wire surface underneath.

mod board;
mod config;
mod error;
mod state;

pub use board::{LikeOutcome, ThoughtBoard};
pub use config::{CONFIG_ENV, Config, ConfigError};
pub use error::BoardError;

// The error types callers match on most come from the layers below.
pub use chirp_api::ApiError;
pub use chirp_store::StoreError;
pub use chirp_types::{CurrentUser, Draft, DraftError, Thought, ThoughtId, UserId};
