//! Identifier newtypes used across the governance engine.
//!
//! Registry-assigned ids (`ModelId`, `VersionId`, `PolicyId`, `ActorId`)
//! arrive from outside and are opaque strings. `DecisionId` is generated
//! per decision; `ViolationId` is derived so that re-evaluating the same
//! version against the same policy always yields the same id.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionId(pub String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyId(pub String);

impl PolicyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity performing an action (requester, approver, overrider).
/// Always passed explicitly; the engine has no ambient current user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a recorded promotion decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub String);

impl DecisionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a policy violation, derived from the (version, policy)
/// pair so repeated evaluations of identical inputs produce identical ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViolationId(pub String);

impl ViolationId {
    pub fn derive(version: &VersionId, policy: &PolicyId) -> Self {
        Self(format!("viol-{}-{}", version.0, policy.0))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ViolationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_id_is_deterministic() {
        let v = VersionId::new("ver-1");
        let p = PolicyId::new("POL-007");
        assert_eq!(ViolationId::derive(&v, &p), ViolationId::derive(&v, &p));
        assert_eq!(ViolationId::derive(&v, &p).0, "viol-ver-1-POL-007");
    }

    #[test]
    fn decision_id_generates_unique() {
        assert_ne!(DecisionId::generate(), DecisionId::generate());
    }

    #[test]
    fn display_is_inner_string() {
        assert_eq!(ModelId::new("m1").to_string(), "m1");
        assert_eq!(ActorId::new("alice").to_string(), "alice");
    }
}
