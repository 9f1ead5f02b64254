//! Policy violations and override claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseError;
use crate::ids::{ActorId, PolicyId, VersionId, ViolationId};

// ── Severity ─────────────────────────────────────────────────────────

/// Severity of a policy violation. Ordered: Low < Medium < High < Critical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(ParseError::UnknownSeverity(other.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Policy Violation ─────────────────────────────────────────────────

/// An unsatisfied policy requirement, produced by the evaluation engine.
///
/// `severity` and `overridable` are snapshots of the policy at
/// evaluation time; later policy edits never rewrite past violations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub id: ViolationId,
    pub policy_id: PolicyId,
    pub severity: Severity,
    pub message: String,
    pub overridable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_applied: Option<ViolationOverride>,
}

impl PolicyViolation {
    pub fn new(
        version_id: &VersionId,
        policy_id: PolicyId,
        severity: Severity,
        message: impl Into<String>,
        overridable: bool,
    ) -> Self {
        Self {
            id: ViolationId::derive(version_id, &policy_id),
            policy_id,
            severity,
            message: message.into(),
            overridable,
            override_applied: None,
        }
    }

    /// Attach an accepted override. The caller has already verified the
    /// violation is overridable and the claim carries a reason.
    pub fn with_override(mut self, applied: ViolationOverride) -> Self {
        self.override_applied = Some(applied);
        self
    }

    pub fn is_overridden(&self) -> bool {
        self.override_applied.is_some()
    }
}

/// A recorded, accepted override on a violation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViolationOverride {
    pub reason: String,
    pub actor: ActorId,
    pub overridden_at: DateTime<Utc>,
}

impl ViolationOverride {
    pub fn new(reason: impl Into<String>, actor: ActorId) -> Self {
        Self {
            reason: reason.into(),
            actor,
            overridden_at: Utc::now(),
        }
    }
}

// ── Override Claim ───────────────────────────────────────────────────

/// A caller's request to override a specific policy's violation.
///
/// A claim is only honored when the policy is overridable and the
/// reason is non-empty after trimming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideClaim {
    pub policy_id: PolicyId,
    pub reason: String,
    pub actor: ActorId,
    pub claimed_at: DateTime<Utc>,
}

impl OverrideClaim {
    pub fn new(policy_id: PolicyId, reason: impl Into<String>, actor: ActorId) -> Self {
        Self {
            policy_id,
            reason: reason.into(),
            actor,
            claimed_at: Utc::now(),
        }
    }

    /// A claim with no substantive reason carries no justification and
    /// must not be honored.
    pub fn has_reason(&self) -> bool {
        !self.reason.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_round_trips_through_str() {
        for sev in Severity::ALL {
            assert_eq!(sev.as_str().parse::<Severity>().unwrap(), sev);
        }
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn violation_id_derived_from_version_and_policy() {
        let v = PolicyViolation::new(
            &VersionId::new("ver-9"),
            PolicyId::new("POL-001"),
            Severity::High,
            "eval suite failed",
            true,
        );
        assert_eq!(v.id, ViolationId::new("viol-ver-9-POL-001"));
        assert!(!v.is_overridden());
    }

    #[test]
    fn override_claim_reason_must_be_substantive() {
        let claim = OverrideClaim::new(
            PolicyId::new("POL-001"),
            "   ",
            ActorId::new("alice"),
        );
        assert!(!claim.has_reason());

        let claim = OverrideClaim::new(
            PolicyId::new("POL-001"),
            "known false positive, tracked in MG-412",
            ActorId::new("alice"),
        );
        assert!(claim.has_reason());
    }
}
