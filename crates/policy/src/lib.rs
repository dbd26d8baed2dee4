//! `routegate-policy` — role-to-route policy configuration (single source of truth).
//!
//! This crate is intentionally decoupled from evaluation and rendering: it
//! holds the startup-validated role table and the public-route allowlist that
//! the access engine consults on every navigation.

pub mod public;
pub mod role;
pub mod store;

pub use public::PublicRouteRegistry;
pub use role::Role;
pub use store::{PolicyConfigError, PolicyStore, RoutePolicy, describe_role};
