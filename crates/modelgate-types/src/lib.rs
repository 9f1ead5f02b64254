//! ModelGate Types - shared domain types for promotion governance
//!
//! Everything the decision engine exchanges lives here: identifiers,
//! the version lifecycle and risk enums, approvals, policy violations,
//! the read-only evaluation context, and the promotion decision card.
//! Decision logic lives in the sibling crates; this crate is data only.
#![deny(unsafe_code)]

pub mod context;
pub mod decision;
pub mod error;
pub mod ids;
pub mod review;
pub mod version;
pub mod violation;

pub use context::{EvaluationContext, SuiteOutcome};
pub use decision::{BlockReason, DecisionRecorded, PromotionDecision};
pub use error::ParseError;
pub use ids::{ActorId, DecisionId, ModelId, PolicyId, VersionId, ViolationId};
pub use review::{Approval, ApprovalCheck, ApprovalStatus, ReviewerRole};
pub use version::{ModelVersion, RiskTier, StateTransitionRequest, VersionState};
pub use violation::{OverrideClaim, PolicyViolation, Severity, ViolationOverride};
