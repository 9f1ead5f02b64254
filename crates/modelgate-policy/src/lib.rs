//! ModelGate Policy - tier-scoped policy rules and the evaluation engine
//!
//! A `Policy` binds a declarative `PolicyRule` to a severity, an
//! override flag, a minimum risk tier, and a priority. The
//! `PolicyEngine` evaluates every applicable policy against an
//! `EvaluationContext` and reports violations; it never mutates state
//! and never stops early, so one critical failure still leaves the
//! caller with the complete picture.
//!
//! Rules fail closed: a rule that cannot be computed because an input
//! is missing becomes a critical, non-overridable violation naming the
//! missing input. A malformed context can block a promotion but never
//! wave one through.
#![deny(unsafe_code)]

pub mod engine;
pub mod rule;

pub use engine::{EvaluationOutcome, PolicyEngine};
pub use rule::{Policy, PolicyRule, RuleFault};
