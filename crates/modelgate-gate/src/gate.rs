//! The promotion gate: one synchronous, side-effect-free decision.

use chrono::Utc;
use tracing::{info, warn};

use modelgate_approvals::RequirementResolver;
use modelgate_lifecycle::{is_promotion, validate_transition};
use modelgate_policy::PolicyEngine;
use modelgate_types::{
    BlockReason, OverrideClaim, PolicyId, PolicyViolation, PromotionDecision, Severity,
    StateTransitionRequest, ViolationOverride,
};

use crate::snapshot::DecisionSnapshot;

/// Reserved policy id stamped on the synthetic violation for a request
/// whose edge does not exist in the lifecycle table. Stored policies
/// must not use the `POL-LIFECYCLE-` prefix.
pub const INVALID_TRANSITION_POLICY_ID: &str = "POL-LIFECYCLE-INVALID-TRANSITION";

/// Combines the lifecycle table, the policy engine and the approval
/// resolver into a single decision.
///
/// `decide` is infallible: every structurally sound input produces a
/// decision card, and a blocked promotion is a decision, not an error.
/// The gate holds no state and touches no storage; it sees only the
/// snapshot it is handed.
pub struct PromotionGate {
    engine: PolicyEngine,
    resolver: RequirementResolver,
}

impl PromotionGate {
    pub fn new() -> Self {
        Self {
            engine: PolicyEngine::new(),
            resolver: RequirementResolver::new(),
        }
    }

    /// Decide one transition request against a snapshot.
    ///
    /// Order of checks:
    /// 1. lifecycle edge - an invalid edge short-circuits with a single
    ///    synthetic violation and no policy or approval work;
    /// 2. policy evaluation, with override claims applied per violation;
    /// 3. approval sufficiency for the version's risk tier.
    pub fn decide(
        &self,
        request: &StateTransitionRequest,
        snapshot: &DecisionSnapshot,
        overrides: &[OverrideClaim],
    ) -> PromotionDecision {
        let version = snapshot.version();
        let current = version.state;

        if !validate_transition(current, request.target) {
            warn!(
                version_id = %version.id,
                from = %current,
                requested = %request.target,
                "invalid lifecycle transition requested"
            );
            let violation = PolicyViolation::new(
                &version.id,
                PolicyId::new(INVALID_TRANSITION_POLICY_ID),
                Severity::Critical,
                format!(
                    "lifecycle: transition from {} to {} is not defined",
                    current, request.target
                ),
                false,
            );
            return PromotionDecision {
                version_id: version.id.clone(),
                allowed: false,
                resolved_target: None,
                blocking: vec![violation],
                overridden: Vec::new(),
                approvals: None,
                reasons: vec![BlockReason::InvalidTransition {
                    from: current,
                    requested: request.target,
                }],
                decided_at: Utc::now(),
            };
        }

        let outcome = self.engine.evaluate(&snapshot.context, &snapshot.policies);

        let mut blocking = Vec::new();
        let mut overridden = Vec::new();
        for violation in outcome.violations {
            // First claim for the policy wins; spent claims are not
            // consumed because one policy yields at most one violation.
            let claim = overrides.iter().find(|c| c.policy_id == violation.policy_id);
            match claim {
                Some(claim) if violation.overridable && claim.has_reason() => {
                    info!(
                        version_id = %version.id,
                        policy_id = %violation.policy_id,
                        actor = %claim.actor,
                        "violation overridden"
                    );
                    overridden.push(violation.with_override(ViolationOverride::new(
                        claim.reason.clone(),
                        claim.actor.clone(),
                    )));
                }
                Some(claim) => {
                    warn!(
                        version_id = %version.id,
                        policy_id = %violation.policy_id,
                        actor = %claim.actor,
                        overridable = violation.overridable,
                        has_reason = claim.has_reason(),
                        "override claim not honored"
                    );
                    blocking.push(violation);
                }
                None => blocking.push(violation),
            }
        }
        sort_for_report(&mut blocking);
        sort_for_report(&mut overridden);

        let check = self.resolver.check(&snapshot.approvals, version.risk_tier);

        let allowed = blocking.is_empty() && check.satisfied;

        let mut reasons = Vec::new();
        if !blocking.is_empty() {
            reasons.push(BlockReason::PolicyBlocked {
                policy_ids: blocking.iter().map(|v| v.policy_id.clone()).collect(),
            });
        }
        if !check.missing_roles.is_empty() {
            reasons.push(BlockReason::MissingApprovals {
                roles: check.missing_roles.clone(),
            });
        }
        if check.two_person_required && !check.two_person_satisfied {
            reasons.push(BlockReason::TwoPersonRuleUnsatisfied {
                distinct_approvers: check.distinct_approvers,
            });
        }

        if allowed {
            info!(
                version_id = %version.id,
                from = %current,
                target = %request.target,
                promotion = is_promotion(current, request.target),
                overridden = overridden.len(),
                "promotion allowed"
            );
        } else {
            warn!(
                version_id = %version.id,
                from = %current,
                target = %request.target,
                blocking = blocking.len(),
                reasons = reasons.len(),
                "promotion blocked"
            );
        }

        PromotionDecision {
            version_id: version.id.clone(),
            allowed,
            resolved_target: allowed.then_some(request.target),
            blocking,
            overridden,
            approvals: Some(check),
            reasons,
            decided_at: Utc::now(),
        }
    }
}

impl Default for PromotionGate {
    fn default() -> Self {
        Self::new()
    }
}

// Report order: most severe first, policy id as tiebreak.
fn sort_for_report(violations: &mut [PolicyViolation]) {
    violations.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.policy_id.cmp(&b.policy_id))
    });
}
