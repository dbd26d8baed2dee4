//! Ordered decision procedure over one access request.

use serde::Serialize;
use tracing::debug;

use routegate_core::PathPrefix;
use routegate_policy::{PolicyStore, PublicRouteRegistry};
use routegate_session::{SessionIntegrity, validate};

use crate::{AccessDecision, AccessRequest, DenyReason};

/// Fixed redirect targets the evaluator hands out for denials that have no
/// role-specific policy to fall back on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorPaths {
    /// Where unauthenticated and integrity-violating sessions are sent.
    pub login: PathPrefix,

    /// Generic safe landing for unknown roles (no policy exists, so no
    /// role-specific default is available).
    pub safe_landing: PathPrefix,
}

impl Default for EvaluatorPaths {
    fn default() -> Self {
        Self {
            login: PathPrefix::new("/login").expect("built-in prefix is valid"),
            safe_landing: PathPrefix::new("/").expect("built-in prefix is valid"),
        }
    }
}

/// The decision core.
///
/// Pure function of its inputs: construction wires in the startup
/// configuration (policy table, public allowlist, fixed redirect targets),
/// and [`evaluate`](Self::evaluate) consults nothing else.
///
/// The rules form an ordered decision list; **order is a correctness
/// requirement**, not a convenience. First match wins:
///
/// 1. loading inputs → [`AccessDecision::Pending`]
/// 2. session mismatch → deny `SESSION_INTEGRITY_VIOLATION` (beats public routes)
/// 3. public path → allow
/// 4. incomplete session → deny `NOT_AUTHENTICATED`
/// 5. unknown role → deny `INVALID_ROLE`
/// 6. any allowed prefix matches → allow
/// 7. otherwise → deny `UNAUTHORIZED_PATH` toward the role's default route
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    policies: PolicyStore,
    public_routes: PublicRouteRegistry,
    paths: EvaluatorPaths,
}

impl AccessEvaluator {
    pub fn new(
        policies: PolicyStore,
        public_routes: PublicRouteRegistry,
        paths: EvaluatorPaths,
    ) -> Self {
        Self {
            policies,
            public_routes,
            paths,
        }
    }

    pub fn policies(&self) -> &PolicyStore {
        &self.policies
    }

    pub fn public_routes(&self) -> &PublicRouteRegistry {
        &self.public_routes
    }

    /// Evaluator over the built-in policy table and public allowlist.
    pub fn standard() -> Self {
        Self::new(
            PolicyStore::standard(),
            PublicRouteRegistry::standard(),
            EvaluatorPaths::default(),
        )
    }

    /// Decide one request.
    ///
    /// Synchronous and non-suspending: no IO, no clock, always returns
    /// immediately. Never panics on any input, including unknown roles.
    pub fn evaluate(&self, request: &AccessRequest) -> AccessDecision {
        let decision = self.decide(request);
        debug!(
            path = %request.path,
            role = request.profile.as_ref().map(|p| p.role.as_str()),
            decision = ?decision,
            "access evaluated"
        );
        decision
    }

    fn decide(&self, request: &AccessRequest) -> AccessDecision {
        // Rule 1: no verdict while collaborators are still loading.
        if request.is_loading {
            return AccessDecision::Pending;
        }

        let integrity = validate(request.identity.as_ref(), request.profile.as_ref());

        // Rule 2: a corrupted session must never be trusted, not even on a
        // public path.
        if integrity == SessionIntegrity::Mismatch {
            return AccessDecision::deny(
                DenyReason::SessionIntegrityViolation,
                self.paths.login.clone(),
            );
        }

        // Rule 3: public routes are reachable with or without a session.
        if self.public_routes.is_public(&request.path) {
            return AccessDecision::Allow;
        }

        // Rule 4: not yet authenticated on a protected path.
        if integrity == SessionIntegrity::Incomplete {
            return AccessDecision::deny(DenyReason::NotAuthenticated, self.paths.login.clone());
        }

        // Integrity is Ok past this point, so the profile is present; the
        // guard keeps the decision list total either way.
        let Some(profile) = request.profile.as_ref() else {
            return AccessDecision::deny(DenyReason::NotAuthenticated, self.paths.login.clone());
        };
        let role = &profile.role;

        // Rule 5: a role without a registered policy is an explicit deny-all.
        let Some(policy) = self.policies.policy_for(role) else {
            return AccessDecision::deny(
                DenyReason::InvalidRole,
                self.paths.safe_landing.clone(),
            );
        };

        // Rules 6 and 7: existential prefix match against the role's policy.
        if policy.allows(&request.path) {
            AccessDecision::Allow
        } else {
            AccessDecision::deny(DenyReason::UnauthorizedPath, policy.default_route.clone())
        }
    }

    /// Decide one request and explain the verdict.
    ///
    /// Answers "why was this allowed/denied?" for the audit trail and for
    /// operators debugging policy configuration.
    pub fn explain(&self, request: &AccessRequest) -> AccessExplanation {
        let decision = self.decide(request);
        let reason = match &decision {
            AccessDecision::Pending => {
                "identity/profile still loading; no verdict emitted".to_string()
            }
            AccessDecision::Allow => {
                if self.public_routes.is_public(&request.path) {
                    format!("'{}' is a public route", request.path)
                } else {
                    let role = request
                        .profile
                        .as_ref()
                        .map(|p| p.role.as_str())
                        .unwrap_or("<none>");
                    format!("role '{role}' allows '{}'", request.path)
                }
            }
            AccessDecision::Deny(denial) => match denial.reason {
                DenyReason::SessionIntegrityViolation => {
                    "identity and profile refer to different users".to_string()
                }
                DenyReason::NotAuthenticated => {
                    format!("no authenticated session for protected path '{}'", request.path)
                }
                DenyReason::InvalidRole => {
                    let role = request
                        .profile
                        .as_ref()
                        .map(|p| p.role.as_str())
                        .unwrap_or("<none>");
                    format!("role '{role}' has no registered policy")
                }
                DenyReason::UnauthorizedPath => {
                    let role = request
                        .profile
                        .as_ref()
                        .map(|p| p.role.as_str())
                        .unwrap_or("<none>");
                    format!("role '{role}' does not allow '{}'", request.path)
                }
            },
        };

        AccessExplanation { decision, reason }
    }
}

/// Decision plus a human-readable explanation.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub decision: AccessDecision,
    pub reason: String,
}
