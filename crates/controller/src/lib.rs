//! `routegate-controller` — the effectful shell around the decision core.
//!
//! Re-runs the evaluator whenever path/identity/profile/loading change,
//! records the verdict, and performs the navigation and logout side effects
//! the pure core is not allowed to.

pub mod collaborators;
pub mod controller;
pub mod view;


pub use collaborators::{AuthGateway, Navigator};
pub use controller::{RedirectController, RedirectControllerConfig};
pub use view::ViewState;
