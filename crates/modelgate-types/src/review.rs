//! Human review: reviewer roles, recorded approvals, and the
//! sufficiency check produced by the approval resolver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseError;
use crate::ids::{ActorId, VersionId};

// ── Reviewer Role ────────────────────────────────────────────────────

/// Review role that can sign off on a promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerRole {
    /// Model review committee.
    Mrc,
    /// Security review.
    Security,
    /// Site reliability / operations review.
    Sre,
}

impl ReviewerRole {
    pub const ALL: [ReviewerRole; 3] = [Self::Mrc, Self::Security, Self::Sre];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mrc => "mrc",
            Self::Security => "security",
            Self::Sre => "sre",
        }
    }
}

impl FromStr for ReviewerRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mrc" => Ok(Self::Mrc),
            "security" => Ok(Self::Security),
            "sre" => Ok(Self::Sre),
            other => Err(ParseError::UnknownReviewerRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReviewerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Approval Status ──────────────────────────────────────────────────

/// Outcome of a single review. Only `Approved` can satisfy a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Approved,
    Rejected,
    Pending,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "pending" => Ok(Self::Pending),
            other => Err(ParseError::UnknownApprovalStatus(other.to_string())),
        }
    }
}

// ── Approval ─────────────────────────────────────────────────────────

/// One recorded review decision for a (version, role) pair.
///
/// Resubmission supersedes: when several entries exist for the same
/// role, only the one with the latest `decided_at` counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    pub version_id: VersionId,
    pub role: ReviewerRole,
    pub approver: ActorId,
    pub status: ApprovalStatus,
    pub decided_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Approval {
    pub fn approved(version_id: VersionId, role: ReviewerRole, approver: ActorId) -> Self {
        Self {
            version_id,
            role,
            approver,
            status: ApprovalStatus::Approved,
            decided_at: Utc::now(),
            comment: None,
        }
    }

    pub fn rejected(version_id: VersionId, role: ReviewerRole, approver: ActorId) -> Self {
        Self {
            version_id,
            role,
            approver,
            status: ApprovalStatus::Rejected,
            decided_at: Utc::now(),
            comment: None,
        }
    }

    pub fn pending(version_id: VersionId, role: ReviewerRole, approver: ActorId) -> Self {
        Self {
            version_id,
            role,
            approver,
            status: ApprovalStatus::Pending,
            decided_at: Utc::now(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_decided_at(mut self, decided_at: DateTime<Utc>) -> Self {
        self.decided_at = decided_at;
        self
    }

    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

// ── Approval Check ───────────────────────────────────────────────────

/// Result of checking recorded approvals against a tier's requirements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCheck {
    /// Roles the version's risk tier requires.
    pub required_roles: Vec<ReviewerRole>,
    /// Required roles with no current approved entry.
    pub missing_roles: Vec<ReviewerRole>,
    /// Required roles whose latest entry is a rejection.
    pub rejected_roles: Vec<ReviewerRole>,
    /// Distinct approver identities across the approved required roles.
    pub distinct_approvers: usize,
    /// Whether the tier mandates the two-person rule.
    pub two_person_required: bool,
    /// Whether at least two distinct identities approved.
    pub two_person_satisfied: bool,
    /// Overall verdict: every required role approved and, where
    /// mandated, the two-person rule satisfied.
    pub satisfied: bool,
}
