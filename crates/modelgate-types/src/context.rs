//! The read-only input bundle a version is evaluated against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::version::ModelVersion;

/// Result of one evaluation suite run against the version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuiteOutcome {
    pub passed: bool,
    /// Aggregate score, when the suite produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SuiteOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            score: None,
        }
    }

    pub fn fail() -> Self {
        Self {
            passed: false,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Everything the policy engine may consult for one evaluation:
/// the version under decision, its evaluation-suite outcomes, lineage
/// facts, and free-form metadata. The engine never mutates it, and
/// missing entries are visible as absent keys rather than defaults.
///
/// Maps are ordered so identical inputs always evaluate identically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    pub version: ModelVersion,
    /// Suite name to outcome, e.g. "bias-eval" or "regression-eval".
    pub evaluation: BTreeMap<String, SuiteOutcome>,
    /// Lineage facts, e.g. "training_data_approved" = "true".
    pub lineage: BTreeMap<String, String>,
    /// Version metadata recorded at registration.
    pub metadata: BTreeMap<String, String>,
}

impl EvaluationContext {
    pub fn new(version: ModelVersion) -> Self {
        Self {
            version,
            evaluation: BTreeMap::new(),
            lineage: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_suite(mut self, suite: impl Into<String>, outcome: SuiteOutcome) -> Self {
        self.evaluation.insert(suite.into(), outcome);
        self
    }

    pub fn with_lineage_fact(
        mut self,
        fact: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.lineage.insert(fact.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
