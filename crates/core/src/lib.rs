//! `routegate-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod path;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use path::PathPrefix;
