//! Decision recording with per-transition deduplication.

use std::collections::HashMap;
use std::sync::{Mutex, mpsc};

use chrono::Utc;
use tracing::{trace, warn};

use routegate_engine::{AccessDecision, AccessRequest, DenyReason};
use routegate_policy::Role;

use crate::{Alert, AuditOutcome, AuditRecord, AuditStore};

/// Dedupe key: one cache slot per (path, role) pair.
type DecisionKey = (String, Option<Role>);

/// Cached verdict for a key; a record is written only when this changes.
type DecisionValue = (AuditOutcome, Option<DenyReason>);

/// Records every decision and escalates denials.
///
/// Fire-and-forget by contract: `record` never blocks and never fails the
/// evaluation path. Store failures are logged and swallowed; denial alerts
/// go out over a channel to the background dispatcher.
///
/// Re-evaluations with unchanged inputs (e.g. a re-render without
/// navigation) are suppressed by a last-decision cache keyed by
/// `(path, role)`: exactly one record is written per distinct transition.
/// The cache is mutex-guarded so the property also holds under concurrent
/// callers.
pub struct AuditLogger<S: AuditStore> {
    store: S,
    alerts: Option<mpsc::Sender<Alert>>,
    last_decision: Mutex<HashMap<DecisionKey, DecisionValue>>,
}

impl<S: AuditStore> AuditLogger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            alerts: None,
            last_decision: Mutex::new(HashMap::new()),
        }
    }

    /// Attach the channel end of a running alert dispatcher.
    pub fn with_alert_sender(mut self, sender: mpsc::Sender<Alert>) -> Self {
        self.alerts = Some(sender);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record one decision.
    ///
    /// `Pending` is not a verdict and writes nothing.
    pub fn record(&self, request: &AccessRequest, decision: &AccessDecision) {
        let (outcome, reason) = match decision {
            AccessDecision::Pending => return,
            AccessDecision::Allow => (AuditOutcome::Allow, None),
            AccessDecision::Deny(denial) => (AuditOutcome::Deny, Some(denial.reason)),
        };

        let role = request.profile.as_ref().map(|p| p.role.clone());
        let key: DecisionKey = (request.path.clone(), role.clone());
        let value: DecisionValue = (outcome, reason);

        {
            let Ok(mut cache) = self.last_decision.lock() else {
                // Poisoned cache: keep recording, dedupe degrades to
                // best-effort.
                self.append_and_escalate(request, role, outcome, reason);
                return;
            };
            if cache.get(&key) == Some(&value) {
                trace!(path = %request.path, "duplicate decision suppressed");
                return;
            }
            cache.insert(key, value);
        }

        self.append_and_escalate(request, role, outcome, reason);
    }

    fn append_and_escalate(
        &self,
        request: &AccessRequest,
        role: Option<Role>,
        outcome: AuditOutcome,
        reason: Option<DenyReason>,
    ) {
        let record = AuditRecord {
            timestamp: Utc::now(),
            identity_id: request.identity.as_ref().map(|i| i.id),
            role: role.clone(),
            path: request.path.clone(),
            outcome,
            reason,
        };

        if let Err(e) = self.store.append(record) {
            warn!(path = %request.path, error = %e, "audit append failed");
        }

        if let (Some(reason), Some(alerts)) = (reason, &self.alerts) {
            let alert = Alert {
                timestamp: Utc::now(),
                identity_id: request.identity.as_ref().map(|i| i.id),
                role,
                path: request.path.clone(),
                reason,
            };
            if alerts.send(alert).is_err() {
                warn!(path = %request.path, "alert dispatcher unavailable, alert dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlertDispatcher, AlertDispatcherConfig, InMemoryAlertSink, InMemoryAuditStore};
    use routegate_core::UserId;
    use routegate_engine::AccessEvaluator;
    use routegate_session::{Identity, Profile};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn request_for(role: &'static str, path: &str) -> AccessRequest {
        let id = UserId::new();
        AccessRequest::new(path)
            .with_identity(Identity::authenticated(id))
            .with_profile(Profile {
                user_id: id,
                role: Role::new(role),
            })
    }

    #[test]
    fn every_decision_writes_exactly_one_record() {
        let logger = AuditLogger::new(InMemoryAuditStore::new());
        let evaluator = AccessEvaluator::standard();

        let allowed = request_for("courier", "/profile");
        logger.record(&allowed, &evaluator.evaluate(&allowed));

        let denied = request_for("courier", "/vendor-dashboard");
        logger.record(&denied, &evaluator.evaluate(&denied));

        let records = logger.store().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].outcome, AuditOutcome::Allow);
        assert_eq!(records[1].outcome, AuditOutcome::Deny);
        assert_eq!(records[1].reason, Some(DenyReason::UnauthorizedPath));
    }

    #[test]
    fn identical_re_evaluation_is_deduplicated() {
        let logger = AuditLogger::new(InMemoryAuditStore::new());
        let evaluator = AccessEvaluator::standard();
        let request = request_for("courier", "/profile");
        let decision = evaluator.evaluate(&request);

        logger.record(&request, &decision);
        logger.record(&request, &decision);
        logger.record(&request, &decision);

        assert_eq!(logger.store().len(), 1);
    }

    #[test]
    fn changed_outcome_for_same_key_is_recorded_again() {
        let logger = AuditLogger::new(InMemoryAuditStore::new());
        let request = request_for("courier", "/wallet");

        logger.record(&request, &AccessDecision::Allow);
        logger.record(
            &request,
            &AccessDecision::deny(
                DenyReason::UnauthorizedPath,
                routegate_core::PathPrefix::new("/courier-dashboard").unwrap(),
            ),
        );
        logger.record(&request, &AccessDecision::Allow);

        assert_eq!(logger.store().len(), 3);
    }

    #[test]
    fn pending_writes_nothing() {
        let logger = AuditLogger::new(InMemoryAuditStore::new());
        let request = request_for("courier", "/wallet").loading();

        logger.record(&request, &AccessDecision::Pending);

        assert!(logger.store().is_empty());
    }

    #[test]
    fn same_path_different_roles_are_distinct_transitions() {
        let logger = AuditLogger::new(InMemoryAuditStore::new());
        let evaluator = AccessEvaluator::standard();

        let courier = request_for("courier", "/profile");
        let seller = request_for("seller", "/profile");
        logger.record(&courier, &evaluator.evaluate(&courier));
        logger.record(&seller, &evaluator.evaluate(&seller));

        assert_eq!(logger.store().len(), 2);
    }

    #[test]
    fn denials_are_forwarded_to_the_alert_sink() {
        let sink = Arc::new(InMemoryAlertSink::new());
        let handle = AlertDispatcher::new(sink.clone()).spawn(
            AlertDispatcherConfig::default().with_initial_backoff(Duration::from_millis(1)),
        );
        let logger =
            AuditLogger::new(InMemoryAuditStore::new()).with_alert_sender(handle.sender());
        let evaluator = AccessEvaluator::standard();

        let allowed = request_for("courier", "/profile");
        logger.record(&allowed, &evaluator.evaluate(&allowed));

        let denied = request_for("courier", "/vendor-dashboard");
        logger.record(&denied, &evaluator.evaluate(&denied));

        let start = Instant::now();
        while sink.alerts().is_empty() && start.elapsed() < Duration::from_secs(2) {
            std::thread::sleep(Duration::from_millis(5));
        }

        let alerts = sink.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].reason, DenyReason::UnauthorizedPath);
        assert_eq!(alerts[0].path, "/vendor-dashboard");
        handle.shutdown();
    }

    #[test]
    fn record_survives_a_missing_dispatcher() {
        // Sender whose receiver is already gone: sends fail, records must not.
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let logger = AuditLogger::new(InMemoryAuditStore::new()).with_alert_sender(tx);
        let evaluator = AccessEvaluator::standard();

        let denied = request_for("courier", "/vendor-dashboard");
        logger.record(&denied, &evaluator.evaluate(&denied));

        assert_eq!(logger.store().len(), 1);
    }
}
