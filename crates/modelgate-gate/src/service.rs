//! Orchestration around the gate: snapshot, decide, record, notify,
//! commit.

use std::sync::Arc;

use tracing::{info, warn};

use modelgate_notify::{PolicyNotifier, SeverityRouting};
use modelgate_types::{
    DecisionRecorded, OverrideClaim, PromotionDecision, StateTransitionRequest, VersionState,
};

use crate::error::GateError;
use crate::gate::PromotionGate;
use crate::traits::{AuditSink, CommitOutcome, CommitSink, NotificationSink, SnapshotProvider};

/// What happened to a promotion request, beyond the decision itself.
#[derive(Clone, Debug)]
pub enum PromotionOutcome {
    /// The decision allowed the transition and the commit landed.
    Applied { decision: PromotionDecision },
    /// The decision blocked the transition; nothing was written.
    Blocked { decision: PromotionDecision },
    /// The decision allowed the transition but the version moved
    /// underneath it. Nothing was written; the caller may re-run the
    /// request against the new state.
    Conflict {
        decision: PromotionDecision,
        actual: VersionState,
    },
}

impl PromotionOutcome {
    pub fn decision(&self) -> &PromotionDecision {
        match self {
            Self::Applied { decision } | Self::Blocked { decision } => decision,
            Self::Conflict { decision, .. } => decision,
        }
    }
}

/// Drives one promotion request end to end.
///
/// Every request loads a fresh snapshot; decisions are never made
/// against cached inputs. The commit is conditional on the state seen
/// in that snapshot, so a concurrent transition surfaces as
/// [`PromotionOutcome::Conflict`] instead of a silent double-apply.
/// Audit and notification failures are logged and never change the
/// outcome.
pub struct PromotionService {
    snapshots: Arc<dyn SnapshotProvider>,
    commits: Arc<dyn CommitSink>,
    notifications: Arc<dyn NotificationSink>,
    audit: Arc<dyn AuditSink>,
    gate: PromotionGate,
    notifier: PolicyNotifier,
}

impl PromotionService {
    pub fn new(
        snapshots: Arc<dyn SnapshotProvider>,
        commits: Arc<dyn CommitSink>,
        notifications: Arc<dyn NotificationSink>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            snapshots,
            commits,
            notifications,
            audit,
            gate: PromotionGate::new(),
            notifier: PolicyNotifier::new(),
        }
    }

    /// Replace the default severity routing table.
    pub fn with_routing(mut self, routing: SeverityRouting) -> Self {
        self.notifier = PolicyNotifier::with_routing(routing);
        self
    }

    /// Decide and, when allowed, apply one transition request.
    ///
    /// Errors are structural only (snapshot load or commit plumbing).
    /// A blocked promotion and a commit conflict are ordinary outcomes.
    pub async fn promote(
        &self,
        request: StateTransitionRequest,
        overrides: &[OverrideClaim],
    ) -> Result<PromotionOutcome, GateError> {
        let snapshot = self
            .snapshots
            .load_decision_inputs(&request.version_id)
            .await?;
        let expected_current = snapshot.version().state;

        let decision = self.gate.decide(&request, &snapshot, overrides);

        // One audit record per decision, allowed or not. A failing sink
        // is reported but never blocks the request.
        let record = DecisionRecorded::new(request.clone(), decision.clone());
        if let Err(err) = self.audit.record(&record).await {
            warn!(
                version_id = %decision.version_id,
                decision_id = %record.decision_id,
                error = %err,
                "audit record failed"
            );
        }

        for intent in self.notifier.intents_for(&decision) {
            if let Err(err) = self.notifications.deliver(&intent).await {
                warn!(key = %intent.key, error = %err, "notification delivery failed");
            }
        }

        if !decision.allowed {
            return Ok(PromotionOutcome::Blocked { decision });
        }

        match self
            .commits
            .commit_transition(&request.version_id, expected_current, request.target)
            .await?
        {
            CommitOutcome::Committed => {
                info!(
                    version_id = %request.version_id,
                    from = %expected_current,
                    to = %request.target,
                    "transition committed"
                );
                Ok(PromotionOutcome::Applied { decision })
            }
            CommitOutcome::Conflict { actual } => {
                warn!(
                    version_id = %request.version_id,
                    expected = %expected_current,
                    actual = %actual,
                    "commit conflict, transition not applied"
                );
                Ok(PromotionOutcome::Conflict { decision, actual })
            }
        }
    }
}
