//! Role → route-policy table, validated at startup.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use routegate_core::PathPrefix;

use crate::Role;

/// Per-role route policy: which path prefixes the role may visit, and where
/// to send it when it strays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePolicy {
    pub allowed_prefixes: Vec<PathPrefix>,
    pub default_route: PathPrefix,
}

impl RoutePolicy {
    /// True iff any allowed prefix matches `path`.
    ///
    /// Matching is existential: prefixes are unordered and a single match is
    /// enough. Overlapping prefixes are harmless since the outcome is binary.
    pub fn allows(&self, path: &str) -> bool {
        self.allowed_prefixes.iter().any(|p| p.matches(path))
    }
}

/// Policy table configuration error.
///
/// These are startup failures: a store that would loop or dead-end a role is
/// refused at construction, it never reaches the evaluator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyConfigError {
    #[error("role '{role}' has an empty allowed-prefix list")]
    EmptyAllowList { role: Role },

    /// The default route must itself be allowed, otherwise every denial for
    /// this role would redirect to a path that is denied again.
    #[error("role '{role}': default route '{default_route}' is not covered by any allowed prefix")]
    DefaultRouteNotAllowed {
        role: Role,
        default_route: PathPrefix,
    },
}

/// The single source of truth mapping roles to route policies.
///
/// Process-wide, loaded once at startup, immutable thereafter. Lookup is
/// O(1). Unknown roles return `None`; the evaluator treats that as an
/// explicit deny-all, never an error.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    policies: HashMap<Role, RoutePolicy>,
}

impl PolicyStore {
    /// Build a store, validating every policy.
    ///
    /// Fails fast on an empty allow-list or a default route not covered by
    /// its own allow-list (the redirect-loop precondition).
    pub fn new(policies: HashMap<Role, RoutePolicy>) -> Result<Self, PolicyConfigError> {
        for (role, policy) in &policies {
            if policy.allowed_prefixes.is_empty() {
                return Err(PolicyConfigError::EmptyAllowList { role: role.clone() });
            }
            if !policy.allows(policy.default_route.as_str()) {
                return Err(PolicyConfigError::DefaultRouteNotAllowed {
                    role: role.clone(),
                    default_route: policy.default_route.clone(),
                });
            }
        }
        debug!(roles = policies.len(), "policy store validated");
        Ok(Self { policies })
    }

    /// Look up the policy for a role. `None` means the role is unknown.
    pub fn policy_for(&self, role: &Role) -> Option<&RoutePolicy> {
        self.policies.get(role)
    }

    /// Registered roles (for audit/registry display).
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.policies.keys()
    }

    /// The built-in role table for the shipped marketplace roles.
    ///
    /// Historically this table lived in two separately-maintained guards with
    /// divergent entries for the same roles; it is now defined exactly once
    /// here so that class of drift cannot recur.
    pub fn standard() -> Self {
        fn prefix(s: &'static str) -> PathPrefix {
            PathPrefix::new(s).expect("built-in prefix is valid")
        }

        let mut policies = HashMap::new();

        policies.insert(
            Role::new("client"),
            RoutePolicy {
                allowed_prefixes: vec![
                    prefix("/home"),
                    prefix("/products"),
                    prefix("/cart"),
                    prefix("/orders"),
                    prefix("/wallet"),
                    prefix("/profile"),
                ],
                default_route: prefix("/home"),
            },
        );

        policies.insert(
            Role::new("seller"),
            RoutePolicy {
                allowed_prefixes: vec![
                    prefix("/vendor-dashboard"),
                    prefix("/catalog"),
                    prefix("/orders"),
                    prefix("/wallet"),
                    prefix("/profile"),
                ],
                default_route: prefix("/vendor-dashboard"),
            },
        );

        policies.insert(
            Role::new("courier"),
            RoutePolicy {
                allowed_prefixes: vec![
                    prefix("/courier-dashboard"),
                    prefix("/missions"),
                    prefix("/wallet"),
                    prefix("/profile"),
                ],
                default_route: prefix("/courier-dashboard"),
            },
        );

        policies.insert(
            Role::new("admin"),
            RoutePolicy {
                allowed_prefixes: vec![
                    prefix("/admin"),
                    prefix("/analytics"),
                    prefix("/profile"),
                ],
                default_route: prefix("/admin"),
            },
        );

        Self::new(policies).expect("built-in policy table is valid")
    }
}

/// Human-readable role description (for audit/registry display).
pub fn describe_role(role: &Role) -> Option<&'static str> {
    match role.as_str() {
        "client" => Some("Buyer with catalog, cart, order and wallet access"),
        "seller" => Some("Vendor with dashboard, catalog and order management"),
        "courier" => Some("Delivery courier with mission and wallet access"),
        "admin" => Some("Platform administrator with analytics access"),
        _ => None,
    }
}
