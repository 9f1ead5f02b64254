//! Point-in-time inputs for a single promotion decision.

use serde::{Deserialize, Serialize};

use modelgate_policy::Policy;
use modelgate_types::{Approval, EvaluationContext, ModelVersion};

/// Everything the gate needs to decide one transition request.
///
/// A snapshot is loaded fresh for every decision and never cached: the
/// version record, the approvals on file and the active policy set all
/// come from the same read so the decision is internally consistent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub context: EvaluationContext,
    pub approvals: Vec<Approval>,
    pub policies: Vec<Policy>,
}

impl DecisionSnapshot {
    pub fn new(context: EvaluationContext, approvals: Vec<Approval>, policies: Vec<Policy>) -> Self {
        Self {
            context,
            approvals,
            policies,
        }
    }

    /// The version under decision.
    pub fn version(&self) -> &ModelVersion {
        &self.context.version
    }
}
