//! The promotion decision card and its audit record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DecisionId, PolicyId, VersionId};
use crate::review::{ApprovalCheck, ReviewerRole};
use crate::version::{StateTransitionRequest, VersionState};
use crate::violation::PolicyViolation;

// ── Block Reason ─────────────────────────────────────────────────────

/// Structured reason a promotion was blocked. A blocked decision
/// carries one entry per distinct cause; an allowed decision carries
/// none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    /// The requested edge does not exist in the lifecycle table.
    InvalidTransition {
        from: VersionState,
        requested: VersionState,
    },
    /// Policy violations remain after overrides were applied.
    PolicyBlocked { policy_ids: Vec<PolicyId> },
    /// Required reviewer roles have no current approval.
    MissingApprovals { roles: Vec<ReviewerRole> },
    /// The two-person rule applies and fewer than two distinct
    /// identities approved.
    TwoPersonRuleUnsatisfied { distinct_approvers: usize },
}

// ── Promotion Decision ───────────────────────────────────────────────

/// The full result of deciding one state-transition request.
///
/// Business outcomes are values on this card, never errors: a blocked
/// promotion is a successful decision whose `allowed` is false.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromotionDecision {
    pub version_id: VersionId,
    pub allowed: bool,
    /// The state the version moves to. Set if and only if `allowed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_target: Option<VersionState>,
    /// Violations still blocking, ordered severity-descending then by
    /// policy id.
    pub blocking: Vec<PolicyViolation>,
    /// Violations neutralized by an accepted override claim.
    pub overridden: Vec<PolicyViolation>,
    /// Approval sufficiency detail. `None` when an invalid transition
    /// short-circuited the decision before approvals were consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals: Option<ApprovalCheck>,
    pub reasons: Vec<BlockReason>,
    pub decided_at: DateTime<Utc>,
}

impl PromotionDecision {
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Policy ids of the violations still blocking, in report order.
    pub fn blocking_policy_ids(&self) -> Vec<&PolicyId> {
        self.blocking.iter().map(|v| &v.policy_id).collect()
    }
}

// ── Decision Record ──────────────────────────────────────────────────

/// Audit record emitted once per decision, allowed or blocked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecorded {
    pub decision_id: DecisionId,
    pub request: StateTransitionRequest,
    pub decision: PromotionDecision,
    pub recorded_at: DateTime<Utc>,
}

impl DecisionRecorded {
    pub fn new(request: StateTransitionRequest, decision: PromotionDecision) -> Self {
        Self {
            decision_id: DecisionId::generate(),
            request,
            decision,
            recorded_at: Utc::now(),
        }
    }
}
