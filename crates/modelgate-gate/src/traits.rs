//! Boundary traits between the pure decision core and the outside world.
//!
//! The gate itself is synchronous and side-effect free. Everything that
//! touches storage or delivery lives behind one of these traits so the
//! service can be wired against the in-memory store in tests and against
//! real backends in production.

use async_trait::async_trait;

use modelgate_notify::NotificationIntent;
use modelgate_types::{DecisionRecorded, VersionId, VersionState};

use crate::error::GateError;
use crate::snapshot::DecisionSnapshot;

/// Loads the full set of decision inputs for a version in one read.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn load_decision_inputs(
        &self,
        version_id: &VersionId,
    ) -> Result<DecisionSnapshot, GateError>;
}

/// Result of a compare-and-set transition commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The stored state matched the expectation and was advanced.
    Committed,
    /// The stored state moved between snapshot and commit. Nothing was
    /// written; `actual` is what the store held at commit time.
    Conflict { actual: VersionState },
}

/// Applies a decided transition to durable state.
///
/// The commit is conditional on the state observed at snapshot time. A
/// conflict is reported, never resolved here; the caller decides whether
/// to re-run the whole decision.
#[async_trait]
pub trait CommitSink: Send + Sync {
    async fn commit_transition(
        &self,
        version_id: &VersionId,
        expected_current: VersionState,
        next: VersionState,
    ) -> Result<CommitOutcome, GateError>;
}

/// Delivers one notification intent to its recipient.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), GateError>;
}

/// Records one decision for audit. Every decision produces exactly one
/// record, whether the promotion was allowed or blocked.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &DecisionRecorded) -> Result<(), GateError>;
}
