//! ModelGate Approvals - tier-based review requirements
//!
//! Maps a risk tier to the reviewer roles that must sign off and
//! checks recorded approvals against that requirement. Role sets grow
//! monotonically with tier, and medium and high tiers additionally
//! carry the two-person rule: the satisfying approvals must come from
//! at least two distinct identities.
//!
//! Approvals are keyed per (version, role); a resubmitted review
//! supersedes the earlier one, so only the latest entry per role is
//! consulted.
#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use modelgate_types::{Approval, ApprovalCheck, ApprovalStatus, ReviewerRole, RiskTier};

/// Resolves which reviewer roles a tier requires and checks recorded
/// approvals for sufficiency.
pub struct RequirementResolver;

impl RequirementResolver {
    pub fn new() -> Self {
        Self
    }

    /// The reviewer roles a version of this tier must collect.
    pub fn required_roles(&self, tier: RiskTier) -> &'static [ReviewerRole] {
        match tier {
            RiskTier::Low => &[ReviewerRole::Mrc],
            RiskTier::Medium => &[ReviewerRole::Mrc, ReviewerRole::Security],
            RiskTier::High => &[
                ReviewerRole::Mrc,
                ReviewerRole::Security,
                ReviewerRole::Sre,
            ],
        }
    }

    /// Whether the tier mandates two distinct approver identities.
    pub fn requires_two_person_approval(&self, tier: RiskTier) -> bool {
        matches!(tier, RiskTier::Medium | RiskTier::High)
    }

    /// Check recorded approvals against the tier's requirement.
    ///
    /// The entries are expected to belong to a single version. For
    /// each role only the entry with the latest `decided_at` counts;
    /// on a tie the later entry in input order wins. Rejected and
    /// pending entries never satisfy a role. Distinct identities are
    /// counted across the approved required roles only, so an approval
    /// for a role the tier does not require cannot help satisfy the
    /// two-person rule.
    pub fn check(&self, approvals: &[Approval], tier: RiskTier) -> ApprovalCheck {
        let required = self.required_roles(tier);

        // Latest entry per role. `>=` lets a later input win a
        // decided_at tie, keeping the collapse total.
        let mut latest: BTreeMap<ReviewerRole, &Approval> = BTreeMap::new();
        for approval in approvals {
            let supersedes = match latest.get(&approval.role) {
                Some(current) => approval.decided_at >= current.decided_at,
                None => true,
            };
            if supersedes {
                latest.insert(approval.role, approval);
            }
        }

        let mut missing_roles = Vec::new();
        let mut rejected_roles = Vec::new();
        let mut approvers = BTreeSet::new();
        for role in required {
            match latest.get(role) {
                Some(entry) if entry.status == ApprovalStatus::Approved => {
                    approvers.insert(&entry.approver);
                }
                Some(entry) if entry.status == ApprovalStatus::Rejected => {
                    rejected_roles.push(*role);
                    missing_roles.push(*role);
                }
                _ => missing_roles.push(*role),
            }
        }

        let distinct_approvers = approvers.len();
        let two_person_required = self.requires_two_person_approval(tier);
        let two_person_satisfied = !two_person_required || distinct_approvers >= 2;
        let satisfied = missing_roles.is_empty() && two_person_satisfied;

        debug!(
            tier = %tier,
            missing = missing_roles.len(),
            distinct_approvers,
            satisfied,
            "approval check"
        );

        ApprovalCheck {
            required_roles: required.to_vec(),
            missing_roles,
            rejected_roles,
            distinct_approvers,
            two_person_required,
            two_person_satisfied,
            satisfied,
        }
    }

    /// Boolean view of [`check`](Self::check) for callers that only
    /// need the verdict.
    pub fn has_sufficient_approvals(&self, approvals: &[Approval], tier: RiskTier) -> bool {
        self.check(approvals, tier).satisfied
    }
}

impl Default for RequirementResolver {
    fn default() -> Self {
        Self::new()
    }
}
