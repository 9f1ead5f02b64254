//! Structural parse failures at the persistence boundary.
//!
//! Every lifecycle enum maps to and from a fixed set of wire strings.
//! An unknown string is corrupt or future data and must surface as an
//! error, never default to some state.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown version state: {0}")]
    UnknownVersionState(String),

    #[error("unknown risk tier: {0}")]
    UnknownRiskTier(String),

    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("unknown reviewer role: {0}")]
    UnknownReviewerRole(String),

    #[error("unknown approval status: {0}")]
    UnknownApprovalStatus(String),
}
