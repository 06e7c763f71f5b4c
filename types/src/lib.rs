//! Core domain types for Chirp.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies: the wire model of a thought, draft validation, and the
//! identity claims decoded out of a bearer token. Everything here can be
//! used from any layer of the client.

mod claims;
mod draft;
mod ids;
mod thought;

pub use claims::{Claims, CurrentUser};
pub use draft::{Draft, DraftError};
pub use ids::{ThoughtId, UserId};
pub use thought::Thought;
