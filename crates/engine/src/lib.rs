//! `routegate-engine` — the route-access decision core.
//!
//! A pure, synchronous decision procedure: given one snapshot of
//! (path, identity, profile, loading flag) it produces one
//! [`AccessDecision`]. No IO, no clocks, no suspension; all effects
//! (audit, redirects, logout) live in the surrounding crates.

pub mod decision;
pub mod evaluator;
pub mod request;

pub use decision::{AccessDecision, Denial, DenyReason};
pub use evaluator::{AccessEvaluator, AccessExplanation, EvaluatorPaths};
pub use request::AccessRequest;
