//! In-memory governance store.
//!
//! Backs both boundary traits for tests and single-process use. All
//! state sits behind one `RwLock` so a snapshot is one consistent read
//! and a commit is one conditional write.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use modelgate_policy::Policy;
use modelgate_types::{
    Approval, EvaluationContext, ModelVersion, SuiteOutcome, VersionId, VersionState,
};

use crate::error::GateError;
use crate::snapshot::DecisionSnapshot;
use crate::traits::{CommitOutcome, CommitSink, SnapshotProvider};

#[derive(Clone, Default)]
struct VersionFacts {
    evaluation: BTreeMap<String, SuiteOutcome>,
    lineage: BTreeMap<String, String>,
    metadata: BTreeMap<String, String>,
}

#[derive(Default)]
struct StoreState {
    versions: HashMap<VersionId, ModelVersion>,
    facts: HashMap<VersionId, VersionFacts>,
    approvals: HashMap<VersionId, Vec<Approval>>,
    policies: Vec<Policy>,
}

/// Registered versions, their recorded facts and approvals, and the
/// active policy set.
///
/// Facts and approvals can only be recorded for a registered version;
/// an unknown id is an error, not a silent new entry.
pub struct InMemoryGovernanceStore {
    inner: RwLock<StoreState>,
}

impl InMemoryGovernanceStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    pub fn insert_version(&self, version: ModelVersion) -> Result<(), GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        state.versions.insert(version.id.clone(), version);
        Ok(())
    }

    pub fn record_suite_outcome(
        &self,
        version_id: &VersionId,
        suite: impl Into<String>,
        outcome: SuiteOutcome,
    ) -> Result<(), GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        if !state.versions.contains_key(version_id) {
            return Err(GateError::VersionNotFound(version_id.clone()));
        }
        state
            .facts
            .entry(version_id.clone())
            .or_default()
            .evaluation
            .insert(suite.into(), outcome);
        Ok(())
    }

    pub fn record_lineage_fact(
        &self,
        version_id: &VersionId,
        fact: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        if !state.versions.contains_key(version_id) {
            return Err(GateError::VersionNotFound(version_id.clone()));
        }
        state
            .facts
            .entry(version_id.clone())
            .or_default()
            .lineage
            .insert(fact.into(), value.into());
        Ok(())
    }

    pub fn record_metadata(
        &self,
        version_id: &VersionId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        if !state.versions.contains_key(version_id) {
            return Err(GateError::VersionNotFound(version_id.clone()));
        }
        state
            .facts
            .entry(version_id.clone())
            .or_default()
            .metadata
            .insert(key.into(), value.into());
        Ok(())
    }

    /// Record a review. One entry per (version, role): a new entry for
    /// a role replaces the previous one.
    pub fn record_approval(&self, approval: Approval) -> Result<(), GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        if !state.versions.contains_key(&approval.version_id) {
            return Err(GateError::VersionNotFound(approval.version_id.clone()));
        }
        let entries = state.approvals.entry(approval.version_id.clone()).or_default();
        match entries.iter().position(|a| a.role == approval.role) {
            Some(idx) => entries[idx] = approval,
            None => entries.push(approval),
        }
        Ok(())
    }

    /// Add a policy to the active set. Ids are unique; the reserved
    /// lifecycle prefix is refused so stored policies can never collide
    /// with the synthetic invalid-transition violation.
    pub fn add_policy(&self, policy: Policy) -> Result<(), GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        if policy.id.0.starts_with("POL-LIFECYCLE-") {
            return Err(GateError::ReservedPolicyId(policy.id));
        }
        if state.policies.iter().any(|p| p.id == policy.id) {
            return Err(GateError::DuplicatePolicy(policy.id));
        }
        state.policies.push(policy);
        Ok(())
    }

    pub fn version_state(&self, version_id: &VersionId) -> Result<VersionState, GateError> {
        let state = self.inner.read().map_err(|_| GateError::LockPoisoned)?;
        state
            .versions
            .get(version_id)
            .map(|v| v.state)
            .ok_or_else(|| GateError::VersionNotFound(version_id.clone()))
    }

    pub fn approvals_for(&self, version_id: &VersionId) -> Result<Vec<Approval>, GateError> {
        let state = self.inner.read().map_err(|_| GateError::LockPoisoned)?;
        Ok(state.approvals.get(version_id).cloned().unwrap_or_default())
    }
}

impl Default for InMemoryGovernanceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotProvider for InMemoryGovernanceStore {
    async fn load_decision_inputs(
        &self,
        version_id: &VersionId,
    ) -> Result<DecisionSnapshot, GateError> {
        let state = self.inner.read().map_err(|_| GateError::LockPoisoned)?;
        let version = state
            .versions
            .get(version_id)
            .cloned()
            .ok_or_else(|| GateError::VersionNotFound(version_id.clone()))?;
        let facts = state.facts.get(version_id).cloned().unwrap_or_default();
        let approvals = state.approvals.get(version_id).cloned().unwrap_or_default();
        let policies = state.policies.clone();

        let mut context = EvaluationContext::new(version);
        context.evaluation = facts.evaluation;
        context.lineage = facts.lineage;
        context.metadata = facts.metadata;

        Ok(DecisionSnapshot::new(context, approvals, policies))
    }
}

#[async_trait]
impl CommitSink for InMemoryGovernanceStore {
    async fn commit_transition(
        &self,
        version_id: &VersionId,
        expected_current: VersionState,
        next: VersionState,
    ) -> Result<CommitOutcome, GateError> {
        let mut state = self.inner.write().map_err(|_| GateError::LockPoisoned)?;
        let version = state
            .versions
            .get_mut(version_id)
            .ok_or_else(|| GateError::VersionNotFound(version_id.clone()))?;
        if version.state != expected_current {
            return Ok(CommitOutcome::Conflict {
                actual: version.state,
            });
        }
        version.state = next;
        Ok(CommitOutcome::Committed)
    }
}
