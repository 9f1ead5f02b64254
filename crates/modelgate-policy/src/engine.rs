//! The policy evaluation engine.

use tracing::{debug, info, warn};

use modelgate_types::{EvaluationContext, PolicyViolation, Severity};

use crate::rule::Policy;

/// Result of evaluating one context against a policy set.
///
/// Violations appear in evaluation order. `passed` reflects the raw
/// outcome before any override is applied; overrides are the gate's
/// concern, not the engine's.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationOutcome {
    pub violations: Vec<PolicyViolation>,
    pub passed: bool,
}

/// Evaluates every applicable policy against an evaluation context.
///
/// The engine holds no state of its own: the policy set is part of the
/// decision snapshot and is passed in per evaluation. Evaluation order
/// is priority descending, then policy id ascending, and every
/// applicable policy runs; a violation never stops the rest of the
/// set, so the caller always sees the complete list.
pub struct PolicyEngine;

impl PolicyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `context` against `policies`.
    ///
    /// Deterministic: identical inputs produce the identical ordered
    /// violation list, derived ids included. A rule that cannot be
    /// computed becomes a critical, non-overridable violation naming
    /// the missing input.
    pub fn evaluate(&self, context: &EvaluationContext, policies: &[Policy]) -> EvaluationOutcome {
        let tier = context.version.risk_tier;

        let mut applicable: Vec<&Policy> =
            policies.iter().filter(|p| p.applies_to(tier)).collect();
        applicable.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));

        let mut violations = Vec::new();
        for policy in applicable {
            match policy.rule.check(context) {
                Ok(true) => {
                    debug!(
                        policy_id = %policy.id,
                        version_id = %context.version.id,
                        "policy satisfied"
                    );
                }
                Ok(false) => {
                    warn!(
                        policy_id = %policy.id,
                        version_id = %context.version.id,
                        severity = %policy.severity,
                        "policy violated"
                    );
                    violations.push(PolicyViolation::new(
                        &context.version.id,
                        policy.id.clone(),
                        policy.severity,
                        format!("{}: {}", policy.name, policy.rule.describe_failure()),
                        policy.can_override,
                    ));
                }
                Err(fault) => {
                    warn!(
                        policy_id = %policy.id,
                        version_id = %context.version.id,
                        fault = %fault,
                        "policy could not be evaluated"
                    );
                    // Fail closed: an uncomputable rule blocks at
                    // critical severity and cannot be overridden.
                    violations.push(PolicyViolation::new(
                        &context.version.id,
                        policy.id.clone(),
                        Severity::Critical,
                        format!("{}: could not be evaluated: {}", policy.name, fault),
                        false,
                    ));
                }
            }
        }

        let passed = violations.is_empty();
        info!(
            version_id = %context.version.id,
            violations = violations.len(),
            passed,
            "policy evaluation complete"
        );
        EvaluationOutcome { violations, passed }
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::PolicyRule;
    use modelgate_types::{ModelId, ModelVersion, PolicyId, RiskTier, SuiteOutcome, VersionId};
    use proptest::prelude::*;

    fn make_context(tier: RiskTier) -> EvaluationContext {
        let version = ModelVersion::new(
            VersionId::new("ver-1"),
            ModelId::new("model-1"),
            "1.2.0",
        )
        .with_risk_tier(tier);
        EvaluationContext::new(version)
            .with_suite("bias-eval", SuiteOutcome::pass().with_score(0.91))
            .with_suite("regression-eval", SuiteOutcome::fail())
            .with_lineage_fact("training_data_approved", "true")
            .with_metadata("owner", "search-ranking")
    }

    fn eval_passed(id: &str, suite: &str, severity: Severity) -> Policy {
        Policy::new(
            PolicyId::new(id),
            format!("{} must pass", suite),
            severity,
            PolicyRule::EvaluationPassed {
                suite: suite.into(),
            },
        )
    }

    #[test]
    fn empty_policy_set_passes() {
        let outcome = PolicyEngine::new().evaluate(&make_context(RiskTier::Low), &[]);
        assert!(outcome.passed);
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn violation_carries_policy_snapshot() {
        let policies = vec![eval_passed("POL-REG", "regression-eval", Severity::High).overridable()];
        let outcome = PolicyEngine::new().evaluate(&make_context(RiskTier::Low), &policies);

        assert!(!outcome.passed);
        assert_eq!(outcome.violations.len(), 1);
        let v = &outcome.violations[0];
        assert_eq!(v.policy_id, PolicyId::new("POL-REG"));
        assert_eq!(v.severity, Severity::High);
        assert!(v.overridable);
        assert!(v.message.contains("regression-eval"));
    }

    #[test]
    fn tier_scoping_filters_policies() {
        let policies = vec![
            eval_passed("POL-REG", "regression-eval", Severity::High).with_min_tier(RiskTier::High)
        ];

        let low = PolicyEngine::new().evaluate(&make_context(RiskTier::Low), &policies);
        assert!(low.passed);

        let high = PolicyEngine::new().evaluate(&make_context(RiskTier::High), &policies);
        assert!(!high.passed);
    }

    #[test]
    fn no_short_circuit_between_policies() {
        let policies = vec![
            eval_passed("POL-A", "regression-eval", Severity::Critical).with_priority(100),
            eval_passed("POL-B", "regression-eval", Severity::Low),
        ];
        let outcome = PolicyEngine::new().evaluate(&make_context(RiskTier::Low), &policies);
        // The critical violation did not stop evaluation of POL-B.
        assert_eq!(outcome.violations.len(), 2);
    }

    #[test]
    fn evaluation_order_is_priority_then_id() {
        let policies = vec![
            eval_passed("POL-B", "regression-eval", Severity::Low),
            eval_passed("POL-A", "regression-eval", Severity::Low),
            eval_passed("POL-C", "regression-eval", Severity::Low).with_priority(50),
        ];
        let outcome = PolicyEngine::new().evaluate(&make_context(RiskTier::Low), &policies);
        let ids: Vec<_> = outcome
            .violations
            .iter()
            .map(|v| v.policy_id.0.as_str())
            .collect();
        assert_eq!(ids, vec!["POL-C", "POL-A", "POL-B"]);
    }

    #[test]
    fn fault_becomes_critical_non_overridable_violation() {
        // Overridable low-severity policy over a suite that was never run.
        let policies =
            vec![eval_passed("POL-ROB", "robustness-eval", Severity::Low).overridable()];
        let outcome = PolicyEngine::new().evaluate(&make_context(RiskTier::Low), &policies);

        assert!(!outcome.passed);
        let v = &outcome.violations[0];
        assert_eq!(v.severity, Severity::Critical);
        assert!(!v.overridable);
        assert!(v.message.contains("robustness-eval"));
        assert!(v.message.contains("could not be evaluated"));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let policies = vec![
            eval_passed("POL-REG", "regression-eval", Severity::High),
            eval_passed("POL-ROB", "robustness-eval", Severity::Low),
            Policy::new(
                PolicyId::new("POL-FREEZE"),
                "freeze",
                Severity::Critical,
                PolicyRule::Never,
            )
            .with_priority(10),
        ];
        let ctx = make_context(RiskTier::Medium);
        let engine = PolicyEngine::new();
        let first = engine.evaluate(&ctx, &policies);
        let second = engine.evaluate(&ctx, &policies);
        assert_eq!(first, second);
    }

    fn simple_rule() -> impl Strategy<Value = PolicyRule> {
        prop_oneof![
            Just(PolicyRule::Always),
            Just(PolicyRule::Never),
            prop::sample::select(RiskTier::ALL.to_vec())
                .prop_map(|max_tier| PolicyRule::TierAtMost { max_tier }),
            Just(PolicyRule::LineageFactPresent {
                fact: "training_data_approved".into()
            }),
            Just(PolicyRule::MetadataPresent {
                key: "owner".into()
            }),
        ]
    }

    fn simple_policy() -> impl Strategy<Value = Policy> {
        (
            0u32..5,
            0u32..100,
            simple_rule(),
            prop::sample::select(RiskTier::ALL.to_vec()),
        )
            .prop_map(|(n, priority, rule, min_tier)| {
                Policy::new(
                    PolicyId::new(format!("POL-{}", n)),
                    format!("policy {}", n),
                    Severity::Medium,
                    rule,
                )
                .with_priority(priority)
                .with_min_tier(min_tier)
            })
    }

    proptest! {
        /// Same inputs, same outcome, and `passed` always mirrors the
        /// violation list.
        #[test]
        fn property_evaluation_deterministic(policies in prop::collection::vec(simple_policy(), 0..8)) {
            let ctx = make_context(RiskTier::Medium);
            let engine = PolicyEngine::new();
            let first = engine.evaluate(&ctx, &policies);
            let second = engine.evaluate(&ctx, &policies);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.passed, first.violations.is_empty());
        }

        /// Every violation points at a policy that was actually in
        /// the applicable set.
        #[test]
        fn property_violations_come_from_applicable_policies(policies in prop::collection::vec(simple_policy(), 0..8)) {
            let ctx = make_context(RiskTier::Medium);
            let outcome = PolicyEngine::new().evaluate(&ctx, &policies);
            for v in &outcome.violations {
                // Generated ids may repeat; at least one applicable
                // policy must carry this id.
                prop_assert!(policies
                    .iter()
                    .any(|p| p.id == v.policy_id && p.applies_to(ctx.version.risk_tier)));
            }
        }
    }
}
