//! Redirect controller: evaluation discipline plus navigation side effects.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use routegate_audit::{AuditLogger, AuditStore};
use routegate_engine::{AccessDecision, AccessEvaluator, AccessRequest, DenyReason};

use crate::{AuthGateway, Navigator, ViewState};

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct RedirectControllerConfig {
    /// How long the violation explanation stays on screen before the
    /// redirect fires.
    pub grace_period: Duration,
}

impl Default for RedirectControllerConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(2000),
        }
    }
}

impl RedirectControllerConfig {
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }
}

/// Effectful shell around the [`AccessEvaluator`].
///
/// The caller invokes [`apply`](Self::apply) with a fresh [`AccessRequest`]
/// whenever path, identity, profile, or loading state change. Every `apply`
/// supersedes whatever redirect was previously scheduled, so a stale timer
/// can never race a newer navigation.
///
/// Scheduling uses the ambient tokio runtime; `apply` must be called from
/// within one.
pub struct RedirectController<S: AuditStore> {
    evaluator: Arc<AccessEvaluator>,
    audit: Arc<AuditLogger<S>>,
    navigator: Arc<dyn Navigator>,
    auth: Arc<dyn AuthGateway>,
    config: RedirectControllerConfig,
    pending: Mutex<Option<tokio::task::JoinHandle<()>>>,
    view: Mutex<ViewState>,
}

impl<S: AuditStore> RedirectController<S> {
    pub fn new(
        evaluator: Arc<AccessEvaluator>,
        audit: Arc<AuditLogger<S>>,
        navigator: Arc<dyn Navigator>,
        auth: Arc<dyn AuthGateway>,
        config: RedirectControllerConfig,
    ) -> Self {
        Self {
            evaluator,
            audit,
            navigator,
            auth,
            config,
            pending: Mutex::new(None),
            view: Mutex::new(ViewState::Loading),
        }
    }

    /// Re-evaluate for a changed input snapshot and drive the side effects.
    ///
    /// Cancels any pending redirect first: if the inputs changed while a
    /// violation screen was counting down, that countdown is obsolete.
    pub fn apply(&self, request: AccessRequest) -> ViewState {
        self.cancel_pending();

        let decision = self.evaluator.evaluate(&request);
        self.audit.record(&request, &decision);

        let view = match decision {
            AccessDecision::Pending => ViewState::Loading,
            AccessDecision::Allow => ViewState::Content,
            AccessDecision::Deny(denial) => {
                if denial.reason == DenyReason::SessionIntegrityViolation {
                    warn!(path = %request.path, "session integrity violation, forcing logout");
                    self.auth.logout();
                }

                info!(
                    path = %request.path,
                    reason = %denial.reason,
                    redirect = %denial.redirect,
                    grace_ms = self.config.grace_period.as_millis() as u64,
                    "access denied, redirect scheduled"
                );
                self.schedule_redirect(denial.redirect.as_str().to_string());

                ViewState::Violation {
                    reason: denial.reason,
                    redirect: denial.redirect,
                }
            }
        };

        if let Ok(mut current) = self.view.lock() {
            *current = view.clone();
        }
        view
    }

    /// What the shell should currently render.
    pub fn view_state(&self) -> ViewState {
        self.view
            .lock()
            .map(|v| v.clone())
            .unwrap_or(ViewState::Loading)
    }

    /// Cancel the scheduled redirect, if any.
    ///
    /// Synchronous and idempotent; safe to call after the timer already
    /// fired (aborting a finished task is a no-op).
    pub fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
                debug!("pending redirect cancelled");
            }
        }
    }

    fn schedule_redirect(&self, target: String) {
        let navigator = self.navigator.clone();
        // Anchor the countdown at the moment the violation is shown, not at
        // the first poll of the spawned task.
        let deadline = tokio::time::Instant::now() + self.config.grace_period;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!(target = %target, "grace period elapsed, navigating");
            // Replace the history entry so the denied page is not one
            // "back" press away.
            navigator.navigate(&target, true);
        });

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(handle);
        }
    }
}

impl<S: AuditStore> Drop for RedirectController<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegate_audit::InMemoryAuditStore;
    use routegate_core::UserId;
    use routegate_policy::Role;
    use routegate_session::{Identity, Profile};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl RecordingNavigator {
        fn calls(&self) -> Vec<(String, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str, replace: bool) {
            self.calls.lock().unwrap().push((path.to_string(), replace));
        }
    }

    #[derive(Default)]
    struct RecordingAuth {
        logouts: AtomicU32,
    }

    impl AuthGateway for RecordingAuth {
        fn logout(&self) {
            self.logouts.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Harness {
        controller: RedirectController<InMemoryAuditStore>,
        navigator: Arc<RecordingNavigator>,
        auth: Arc<RecordingAuth>,
    }

    fn harness() -> Harness {
        let navigator = Arc::new(RecordingNavigator::default());
        let auth = Arc::new(RecordingAuth::default());
        let controller = RedirectController::new(
            Arc::new(AccessEvaluator::standard()),
            Arc::new(AuditLogger::new(InMemoryAuditStore::new())),
            navigator.clone(),
            auth.clone(),
            RedirectControllerConfig::default(),
        );
        Harness {
            controller,
            navigator,
            auth,
        }
    }

    fn request_for(role: &'static str, path: &str) -> AccessRequest {
        let id = UserId::new();
        AccessRequest::new(path)
            .with_identity(Identity::authenticated(id))
            .with_profile(Profile {
                user_id: id,
                role: Role::new(role),
            })
    }

    /// Let spawned timer tasks observe advanced (paused) time.
    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loading_renders_spinner_and_never_navigates() {
        let h = harness();
        let view = h.controller.apply(request_for("courier", "/wallet").loading());

        assert_eq!(view, ViewState::Loading);
        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(h.navigator.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn allow_renders_content() {
        let h = harness();
        let view = h.controller.apply(request_for("courier", "/profile"));

        assert_eq!(view, ViewState::Content);
        assert_eq!(h.controller.view_state(), ViewState::Content);
        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(h.navigator.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deny_shows_violation_then_navigates_after_grace_period() {
        let h = harness();
        let view = h.controller.apply(request_for("courier", "/vendor-dashboard"));

        match view {
            ViewState::Violation { reason, redirect } => {
                assert_eq!(reason, DenyReason::UnauthorizedPath);
                assert_eq!(redirect.as_str(), "/courier-dashboard");
            }
            other => panic!("expected violation, got {other:?}"),
        }

        // Still inside the grace period: no navigation yet.
        tokio::time::advance(Duration::from_millis(1999)).await;
        settle().await;
        assert!(h.navigator.calls().is_empty());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(
            h.navigator.calls(),
            vec![("/courier-dashboard".to_string(), true)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn grace_period_is_anchored_at_the_violation_not_at_first_poll() {
        let h = harness();
        h.controller.apply(request_for("courier", "/vendor-dashboard"));

        // Advance the full grace period before the timer task has ever been
        // polled; the deadline must count from apply, so this is enough.
        tokio::time::advance(Duration::from_millis(2000)).await;
        settle().await;
        assert_eq!(
            h.navigator.calls(),
            vec![("/courier-dashboard".to_string(), true)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn input_change_cancels_the_pending_redirect() {
        let h = harness();
        h.controller.apply(request_for("courier", "/vendor-dashboard"));

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;

        // The user navigated somewhere legitimate before the timer fired.
        let view = h.controller.apply(request_for("courier", "/profile"));
        assert_eq!(view, ViewState::Content);

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(h.navigator.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_denial_supersedes_the_older_redirect() {
        let h = harness();
        h.controller.apply(request_for("courier", "/vendor-dashboard"));
        h.controller.apply(request_for("courier", "/admin"));

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;

        // Only the newest denial's redirect fires, exactly once.
        assert_eq!(
            h.navigator.calls(),
            vec![("/courier-dashboard".to_string(), true)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pending_is_idempotent_even_after_firing() {
        let h = harness();
        h.controller.apply(request_for("courier", "/vendor-dashboard"));

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(h.navigator.calls().len(), 1);

        // Timer already fired; cancelling now must be a harmless no-op.
        h.controller.cancel_pending();
        h.controller.cancel_pending();
        assert_eq!(h.navigator.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn session_mismatch_forces_logout_and_redirects_to_login() {
        let h = harness();
        let request = AccessRequest::new("/wallet")
            .with_identity(Identity::authenticated(UserId::new()))
            .with_profile(Profile {
                user_id: UserId::new(),
                role: Role::new("client"),
            });

        let view = h.controller.apply(request);
        match view {
            ViewState::Violation { reason, redirect } => {
                assert_eq!(reason, DenyReason::SessionIntegrityViolation);
                assert_eq!(redirect.as_str(), "/login");
            }
            other => panic!("expected violation, got {other:?}"),
        }

        // Logout is immediate, not deferred behind the grace period.
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(h.navigator.calls(), vec![("/login".to_string(), true)]);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthenticated_visitor_on_public_route_sees_content() {
        let h = harness();
        let view = h.controller.apply(AccessRequest::new("/"));
        assert_eq!(view, ViewState::Content);
    }
}
