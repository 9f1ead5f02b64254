//! ModelGate Gate - the promotion blocking decision and its orchestration
//!
//! The gate fuses the three governance checks into one decision:
//!
//! 1. **Lifecycle** - is the requested edge legal at all? An invalid
//!    edge short-circuits everything else.
//! 2. **Policy** - every applicable policy is evaluated; override
//!    claims are applied to overridable violations only.
//! 3. **Approvals** - the tier's reviewer roles must have current
//!    approvals, with the two-person rule for medium and high tiers.
//!
//! `PromotionGate::decide` is pure and synchronous; it sees the world
//! only through a `DecisionSnapshot`. The async `PromotionService`
//! owns the I/O choreography around it: load a fresh snapshot, decide,
//! record exactly one audit entry, emit notification intents, and
//! commit the transition with a compare-and-set. A commit conflict is
//! surfaced to the caller rather than retried.
//!
//! # Example
//!
//! ```
//! use modelgate_gate::{DecisionSnapshot, PromotionGate};
//! use modelgate_types::{
//!     ActorId, Approval, EvaluationContext, ModelId, ModelVersion,
//!     ReviewerRole, StateTransitionRequest, VersionId, VersionState,
//! };
//!
//! let version = ModelVersion::new(
//!     VersionId::new("ver-1"),
//!     ModelId::new("model-1"),
//!     "1.0.0",
//! )
//! .with_state(VersionState::Submitted);
//!
//! let approvals = vec![Approval::approved(
//!     VersionId::new("ver-1"),
//!     ReviewerRole::Mrc,
//!     ActorId::new("alice"),
//! )];
//! let snapshot = DecisionSnapshot::new(EvaluationContext::new(version), approvals, vec![]);
//!
//! let request = StateTransitionRequest::new(
//!     VersionId::new("ver-1"),
//!     VersionState::ApprovedStaging,
//!     ActorId::new("alice"),
//! );
//! let decision = PromotionGate::new().decide(&request, &snapshot, &[]);
//! assert!(decision.allowed);
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod gate;
pub mod memory;
pub mod mocks;
pub mod service;
pub mod snapshot;
pub mod traits;

pub use error::GateError;
pub use gate::{PromotionGate, INVALID_TRANSITION_POLICY_ID};
pub use memory::InMemoryGovernanceStore;
pub use mocks::{RecordingAuditSink, RecordingNotificationSink};
pub use service::{PromotionOutcome, PromotionService};
pub use snapshot::DecisionSnapshot;
pub use traits::{AuditSink, CommitOutcome, CommitSink, NotificationSink, SnapshotProvider};
