//! Policy definitions and the closed rule predicate set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use modelgate_types::{EvaluationContext, PolicyId, RiskTier, Severity};

// ── Policy ───────────────────────────────────────────────────────────

/// A governance policy: a named requirement a version must satisfy
/// before promotion.
///
/// `severity` and `can_override` are copied onto any violation the
/// policy produces, so a decision snapshot stays faithful to the
/// policy as it was at evaluation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub name: String,
    pub severity: Severity,
    pub rule: PolicyRule,
    /// Whether a violation of this policy may be overridden with a
    /// justified claim.
    pub can_override: bool,
    /// The policy applies to versions at or above this tier.
    pub min_tier: RiskTier,
    /// Evaluation order: higher priority evaluates first.
    pub priority: u32,
}

impl Policy {
    pub fn new(
        id: PolicyId,
        name: impl Into<String>,
        severity: Severity,
        rule: PolicyRule,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            severity,
            rule,
            can_override: false,
            min_tier: RiskTier::Low,
            priority: 0,
        }
    }

    pub fn overridable(mut self) -> Self {
        self.can_override = true;
        self
    }

    pub fn with_min_tier(mut self, tier: RiskTier) -> Self {
        self.min_tier = tier;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this policy applies to a version of the given tier.
    pub fn applies_to(&self, tier: RiskTier) -> bool {
        tier >= self.min_tier
    }
}

// ── Rule ─────────────────────────────────────────────────────────────

/// The closed set of requirements a policy can state.
///
/// A rule checks to `Ok(true)` when satisfied and `Ok(false)` when
/// violated. `Err(RuleFault)` means the rule could not be computed at
/// all; the engine turns that into a critical violation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyRule {
    /// Always satisfied. Useful as a compound branch.
    Always,
    /// Never satisfied. Used for promotion freezes.
    Never,
    /// The named evaluation suite ran and passed.
    EvaluationPassed { suite: String },
    /// The named suite's score is at least `min_score`.
    MinEvaluationScore { suite: String, min_score: f64 },
    /// The lineage fact is recorded, whatever its value.
    LineageFactPresent { fact: String },
    /// The lineage fact is recorded with exactly this value.
    LineageFactEquals { fact: String, expected: String },
    /// The metadata key is present.
    MetadataPresent { key: String },
    /// The metadata key is present with exactly this value.
    MetadataEquals { key: String, expected: String },
    /// The version's declared tier is at most `max_tier`.
    TierAtMost { max_tier: RiskTier },
    /// Every branch must hold.
    All { rules: Vec<PolicyRule> },
    /// At least one branch must hold.
    Any { rules: Vec<PolicyRule> },
}

/// A rule that could not be computed because an input was absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFault {
    #[error("evaluation suite not recorded: {suite}")]
    MissingSuite { suite: String },

    #[error("evaluation suite has no score: {suite}")]
    MissingScore { suite: String },

    #[error("lineage fact not recorded: {fact}")]
    MissingLineageFact { fact: String },

    #[error("metadata key not recorded: {key}")]
    MissingMetadata { key: String },
}

impl PolicyRule {
    /// Check this rule against the context.
    ///
    /// Presence rules treat an absent entry as an ordinary violation;
    /// value rules treat it as a fault, since the comparison itself is
    /// impossible. Compound rules scan every branch so a fault is
    /// never masked by a branch that happened to hold.
    pub fn check(&self, ctx: &EvaluationContext) -> Result<bool, RuleFault> {
        match self {
            Self::Always => Ok(true),
            Self::Never => Ok(false),
            Self::EvaluationPassed { suite } => match ctx.evaluation.get(suite) {
                Some(outcome) => Ok(outcome.passed),
                None => Err(RuleFault::MissingSuite {
                    suite: suite.clone(),
                }),
            },
            Self::MinEvaluationScore { suite, min_score } => {
                let outcome = ctx.evaluation.get(suite).ok_or_else(|| {
                    RuleFault::MissingSuite {
                        suite: suite.clone(),
                    }
                })?;
                let score = outcome.score.ok_or_else(|| RuleFault::MissingScore {
                    suite: suite.clone(),
                })?;
                Ok(score >= *min_score)
            }
            Self::LineageFactPresent { fact } => Ok(ctx.lineage.contains_key(fact)),
            Self::LineageFactEquals { fact, expected } => match ctx.lineage.get(fact) {
                Some(value) => Ok(value == expected),
                None => Err(RuleFault::MissingLineageFact { fact: fact.clone() }),
            },
            Self::MetadataPresent { key } => Ok(ctx.metadata.contains_key(key)),
            Self::MetadataEquals { key, expected } => match ctx.metadata.get(key) {
                Some(value) => Ok(value == expected),
                None => Err(RuleFault::MissingMetadata { key: key.clone() }),
            },
            Self::TierAtMost { max_tier } => Ok(ctx.version.risk_tier <= *max_tier),
            Self::All { rules } => {
                let mut satisfied = true;
                for rule in rules {
                    if !rule.check(ctx)? {
                        satisfied = false;
                    }
                }
                Ok(satisfied)
            }
            Self::Any { rules } => {
                let mut satisfied = false;
                for rule in rules {
                    if rule.check(ctx)? {
                        satisfied = true;
                    }
                }
                Ok(satisfied)
            }
        }
    }

    /// Human-readable description of what an unsatisfied check means.
    pub fn describe_failure(&self) -> String {
        match self {
            Self::Always => "requirement unexpectedly failed".to_string(),
            Self::Never => "promotions are frozen by this policy".to_string(),
            Self::EvaluationPassed { suite } => {
                format!("evaluation suite '{}' did not pass", suite)
            }
            Self::MinEvaluationScore { suite, min_score } => {
                format!("evaluation suite '{}' scored below {}", suite, min_score)
            }
            Self::LineageFactPresent { fact } => {
                format!("lineage fact '{}' is not recorded", fact)
            }
            Self::LineageFactEquals { fact, expected } => {
                format!("lineage fact '{}' is not '{}'", fact, expected)
            }
            Self::MetadataPresent { key } => {
                format!("metadata key '{}' is not set", key)
            }
            Self::MetadataEquals { key, expected } => {
                format!("metadata key '{}' is not '{}'", key, expected)
            }
            Self::TierAtMost { max_tier } => {
                format!("risk tier exceeds {}", max_tier)
            }
            Self::All { .. } => "not all requirements held".to_string(),
            Self::Any { .. } => "none of the alternative requirements held".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_types::{ModelId, ModelVersion, SuiteOutcome, VersionId};

    fn make_context() -> EvaluationContext {
        let version = ModelVersion::new(
            VersionId::new("ver-1"),
            ModelId::new("model-1"),
            "1.2.0",
        )
        .with_risk_tier(RiskTier::Medium);
        EvaluationContext::new(version)
            .with_suite("bias-eval", SuiteOutcome::pass().with_score(0.91))
            .with_suite("regression-eval", SuiteOutcome::fail())
            .with_lineage_fact("training_data_approved", "true")
            .with_metadata("owner", "search-ranking")
    }

    #[test]
    fn evaluation_passed_rule() {
        let ctx = make_context();
        let rule = PolicyRule::EvaluationPassed {
            suite: "bias-eval".into(),
        };
        assert_eq!(rule.check(&ctx), Ok(true));

        let rule = PolicyRule::EvaluationPassed {
            suite: "regression-eval".into(),
        };
        assert_eq!(rule.check(&ctx), Ok(false));
    }

    #[test]
    fn missing_suite_is_a_fault() {
        let ctx = make_context();
        let rule = PolicyRule::EvaluationPassed {
            suite: "robustness-eval".into(),
        };
        assert_eq!(
            rule.check(&ctx),
            Err(RuleFault::MissingSuite {
                suite: "robustness-eval".into()
            })
        );
    }

    #[test]
    fn min_score_boundary_is_inclusive() {
        let ctx = make_context();
        let at = PolicyRule::MinEvaluationScore {
            suite: "bias-eval".into(),
            min_score: 0.91,
        };
        assert_eq!(at.check(&ctx), Ok(true));

        let above = PolicyRule::MinEvaluationScore {
            suite: "bias-eval".into(),
            min_score: 0.95,
        };
        assert_eq!(above.check(&ctx), Ok(false));
    }

    #[test]
    fn score_rule_faults_when_suite_has_no_score() {
        let ctx = make_context();
        let rule = PolicyRule::MinEvaluationScore {
            suite: "regression-eval".into(),
            min_score: 0.5,
        };
        assert_eq!(
            rule.check(&ctx),
            Err(RuleFault::MissingScore {
                suite: "regression-eval".into()
            })
        );
    }

    #[test]
    fn presence_rules_treat_absence_as_violation_not_fault() {
        let ctx = make_context();
        let rule = PolicyRule::LineageFactPresent {
            fact: "base_model".into(),
        };
        assert_eq!(rule.check(&ctx), Ok(false));

        let rule = PolicyRule::MetadataPresent { key: "team".into() };
        assert_eq!(rule.check(&ctx), Ok(false));
    }

    #[test]
    fn equals_rules_fault_on_absence() {
        let ctx = make_context();
        let rule = PolicyRule::LineageFactEquals {
            fact: "base_model".into(),
            expected: "foundation-3".into(),
        };
        assert!(rule.check(&ctx).is_err());

        let rule = PolicyRule::MetadataEquals {
            key: "owner".into(),
            expected: "search-ranking".into(),
        };
        assert_eq!(rule.check(&ctx), Ok(true));
    }

    #[test]
    fn tier_at_most() {
        let ctx = make_context(); // Medium
        assert_eq!(
            PolicyRule::TierAtMost {
                max_tier: RiskTier::High
            }
            .check(&ctx),
            Ok(true)
        );
        assert_eq!(
            PolicyRule::TierAtMost {
                max_tier: RiskTier::Low
            }
            .check(&ctx),
            Ok(false)
        );
    }

    #[test]
    fn all_requires_every_branch() {
        let ctx = make_context();
        let rule = PolicyRule::All {
            rules: vec![
                PolicyRule::EvaluationPassed {
                    suite: "bias-eval".into(),
                },
                PolicyRule::EvaluationPassed {
                    suite: "regression-eval".into(),
                },
            ],
        };
        assert_eq!(rule.check(&ctx), Ok(false));
    }

    #[test]
    fn any_requires_one_branch() {
        let ctx = make_context();
        let rule = PolicyRule::Any {
            rules: vec![
                PolicyRule::EvaluationPassed {
                    suite: "regression-eval".into(),
                },
                PolicyRule::EvaluationPassed {
                    suite: "bias-eval".into(),
                },
            ],
        };
        assert_eq!(rule.check(&ctx), Ok(true));
    }

    #[test]
    fn any_does_not_mask_faults() {
        let ctx = make_context();
        // The second branch holds, but the first cannot be computed.
        let rule = PolicyRule::Any {
            rules: vec![
                PolicyRule::MetadataEquals {
                    key: "team".into(),
                    expected: "x".into(),
                },
                PolicyRule::Always,
            ],
        };
        assert!(rule.check(&ctx).is_err());
    }

    #[test]
    fn all_surfaces_fault_behind_failed_branch() {
        let ctx = make_context();
        let rule = PolicyRule::All {
            rules: vec![
                PolicyRule::Never,
                PolicyRule::LineageFactEquals {
                    fact: "base_model".into(),
                    expected: "foundation-3".into(),
                },
            ],
        };
        assert!(rule.check(&ctx).is_err());
    }

    #[test]
    fn policy_tier_scoping() {
        let policy = Policy::new(
            PolicyId::new("POL-1"),
            "high tier only",
            Severity::High,
            PolicyRule::Always,
        )
        .with_min_tier(RiskTier::High);

        assert!(!policy.applies_to(RiskTier::Low));
        assert!(!policy.applies_to(RiskTier::Medium));
        assert!(policy.applies_to(RiskTier::High));
    }

    #[test]
    fn policy_defaults() {
        let policy = Policy::new(
            PolicyId::new("POL-1"),
            "p",
            Severity::Low,
            PolicyRule::Always,
        );
        assert!(!policy.can_override);
        assert_eq!(policy.min_tier, RiskTier::Low);
        assert_eq!(policy.priority, 0);
    }

    #[test]
    fn rule_serde_round_trip() {
        let rule = PolicyRule::All {
            rules: vec![
                PolicyRule::EvaluationPassed {
                    suite: "bias-eval".into(),
                },
                PolicyRule::TierAtMost {
                    max_tier: RiskTier::Medium,
                },
            ],
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"kind\":\"all\""));
        let back: PolicyRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
