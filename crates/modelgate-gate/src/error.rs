//! Errors from the promotion gate boundary.
//!
//! Only structural failures live here. A blocked promotion is not an
//! error; it is a `PromotionDecision` with `allowed = false`.

use thiserror::Error;

use modelgate_types::{ParseError, VersionId};

#[derive(Error, Debug)]
pub enum GateError {
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    #[error("snapshot load failed: {0}")]
    Snapshot(String),

    #[error("malformed stored record: {0}")]
    Malformed(#[from] ParseError),

    #[error("duplicate policy: {0}")]
    DuplicatePolicy(modelgate_types::PolicyId),

    #[error("policy id {0} uses the reserved lifecycle prefix")]
    ReservedPolicyId(modelgate_types::PolicyId),

    #[error("governance store lock poisoned")]
    LockPoisoned,

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("notification delivery failed for {key}: {reason}")]
    Delivery { key: String, reason: String },

    #[error("audit record failed: {0}")]
    Audit(String),
}
