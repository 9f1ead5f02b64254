//! Model versions and their lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseError;
use crate::ids::{ActorId, ModelId, VersionId};

// ── Version State ────────────────────────────────────────────────────

/// Lifecycle state of a model version.
///
/// The set is closed; which edges between states are legal is defined by
/// the state machine in `modelgate-lifecycle`. `Retired` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    /// Author is still iterating; not yet in review.
    Draft,
    /// Submitted for review.
    Submitted,
    /// A reviewer sent it back; must be resubmitted.
    ChangesRequested,
    /// Cleared for deployment to staging.
    ApprovedStaging,
    /// Serving in the staging environment.
    Staging,
    /// Cleared for deployment to production.
    ApprovedProd,
    /// Serving in production.
    Production,
    /// Still serving but scheduled for removal.
    Deprecated,
    /// Fully removed. No further transitions.
    Retired,
}

impl VersionState {
    /// All states, in lifecycle order.
    pub const ALL: [VersionState; 9] = [
        Self::Draft,
        Self::Submitted,
        Self::ChangesRequested,
        Self::ApprovedStaging,
        Self::Staging,
        Self::ApprovedProd,
        Self::Production,
        Self::Deprecated,
        Self::Retired,
    ];

    /// Whether the state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Retired)
    }

    /// The stable wire name for this state (matches the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::ChangesRequested => "changes_requested",
            Self::ApprovedStaging => "approved_staging",
            Self::Staging => "staging",
            Self::ApprovedProd => "approved_prod",
            Self::Production => "production",
            Self::Deprecated => "deprecated",
            Self::Retired => "retired",
        }
    }
}

impl FromStr for VersionState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "changes_requested" => Ok(Self::ChangesRequested),
            "approved_staging" => Ok(Self::ApprovedStaging),
            "staging" => Ok(Self::Staging),
            "approved_prod" => Ok(Self::ApprovedProd),
            "production" => Ok(Self::Production),
            "deprecated" => Ok(Self::Deprecated),
            "retired" => Ok(Self::Retired),
            other => Err(ParseError::UnknownVersionState(other.to_string())),
        }
    }
}

impl std::fmt::Display for VersionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Risk Tier ────────────────────────────────────────────────────────

/// Declared risk tier of a model version. Ordered: Low < Medium < High.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for RiskTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseError::UnknownRiskTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Model Version ────────────────────────────────────────────────────

/// A registered model version. The decision engine treats it as
/// read-only; state changes are committed by the surrounding store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub id: VersionId,
    pub model_id: ModelId,
    /// Semantic version label assigned at registration, e.g. "2.4.0".
    pub semver: String,
    pub state: VersionState,
    pub risk_tier: RiskTier,
    pub created_at: DateTime<Utc>,
}

impl ModelVersion {
    pub fn new(id: VersionId, model_id: ModelId, semver: impl Into<String>) -> Self {
        Self {
            id,
            model_id,
            semver: semver.into(),
            state: VersionState::Draft,
            risk_tier: RiskTier::Low,
            created_at: Utc::now(),
        }
    }

    pub fn with_state(mut self, state: VersionState) -> Self {
        self.state = state;
        self
    }

    pub fn with_risk_tier(mut self, tier: RiskTier) -> Self {
        self.risk_tier = tier;
        self
    }
}

// ── Transition Request ───────────────────────────────────────────────

/// A request to move a version to a new lifecycle state.
///
/// The requesting identity is carried explicitly on every request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransitionRequest {
    pub version_id: VersionId,
    pub target: VersionState,
    pub requested_by: ActorId,
    pub requested_at: DateTime<Utc>,
}

impl StateTransitionRequest {
    pub fn new(version_id: VersionId, target: VersionState, requested_by: ActorId) -> Self {
        Self {
            version_id,
            target,
            requested_by,
            requested_at: Utc::now(),
        }
    }
}
