//! Public-route allowlist.

use routegate_core::PathPrefix;

/// Set of path prefixes reachable without any identity.
///
/// Uses the same boundary-safe matching rule as [`RoutePolicy`](crate::RoutePolicy)
/// so public/protected semantics cannot diverge from policy semantics.
#[derive(Debug, Clone)]
pub struct PublicRouteRegistry {
    prefixes: Vec<PathPrefix>,
}

impl PublicRouteRegistry {
    pub fn new(prefixes: Vec<PathPrefix>) -> Self {
        Self { prefixes }
    }

    /// True iff `path` is reachable without authentication.
    pub fn is_public(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| p.matches(path))
    }

    /// The built-in public surface: landing page, auth entry points, about.
    pub fn standard() -> Self {
        fn prefix(s: &'static str) -> PathPrefix {
            PathPrefix::new(s).expect("built-in prefix is valid")
        }

        Self::new(vec![
            prefix("/"),
            prefix("/login"),
            prefix("/register"),
            prefix("/about"),
        ])
    }
}
