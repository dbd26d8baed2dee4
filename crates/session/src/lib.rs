//! `routegate-session` — identity/profile facts and session-integrity checks.
//!
//! Identity comes from the auth collaborator, Profile from the profile store;
//! the two load independently and may disagree. This crate only states facts
//! about one snapshot of the pair, it performs no IO.

pub mod identity;
pub mod validate;

pub use identity::{Identity, Profile};
pub use validate::{SessionIntegrity, validate};
