//! ModelGate Notify - notification intents for blocked promotions
//!
//! Downstream of a decision, each blocking violation fans out into
//! notification intents: one per recipient the violation's severity
//! routes to. Intents are value objects with a deterministic key of
//! (version, policy, recipient); producing them twice for the same
//! decision yields the same sequence, so delivery retries cannot
//! duplicate work. Delivery itself lives behind the gate's sink trait.
#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use tracing::debug;

use modelgate_types::{PolicyId, PromotionDecision, ReviewerRole, Severity, VersionId};

// ── Recipient ────────────────────────────────────────────────────────

/// Who a notification is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// The team that owns the model.
    OwningTeam,
    /// Every member of a reviewer role.
    Role(ReviewerRole),
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OwningTeam => write!(f, "owning-team"),
            Self::Role(role) => write!(f, "role-{}", role),
        }
    }
}

// ── Notification Intent ──────────────────────────────────────────────

/// An addressed, keyed notification waiting to be delivered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    /// Deterministic dedup key: `version:policy:recipient`.
    pub key: String,
    pub version_id: VersionId,
    pub policy_id: PolicyId,
    pub severity: Severity,
    pub recipient: Recipient,
    pub message: String,
}

impl NotificationIntent {
    fn key_for(version: &VersionId, policy: &PolicyId, recipient: Recipient) -> String {
        format!("{}:{}:{}", version, policy, recipient)
    }
}

// ── Recipient Routing ────────────────────────────────────────────────

/// Maps a violation severity to the recipients who should hear about it.
pub trait RecipientResolver {
    fn recipients_for(&self, severity: Severity) -> Vec<Recipient>;
}

/// Default severity routing table.
///
/// Low severity stays with the owning team; higher severities pull in
/// the review roles, and critical always reaches security.
#[derive(Clone, Debug)]
pub struct SeverityRouting {
    low: Vec<Recipient>,
    medium: Vec<Recipient>,
    high: Vec<Recipient>,
    critical: Vec<Recipient>,
}

impl SeverityRouting {
    /// Replace the recipient list for one severity.
    pub fn with_route(mut self, severity: Severity, recipients: Vec<Recipient>) -> Self {
        match severity {
            Severity::Low => self.low = recipients,
            Severity::Medium => self.medium = recipients,
            Severity::High => self.high = recipients,
            Severity::Critical => self.critical = recipients,
        }
        self
    }
}

impl Default for SeverityRouting {
    fn default() -> Self {
        Self {
            low: vec![Recipient::OwningTeam],
            medium: vec![Recipient::OwningTeam, Recipient::Role(ReviewerRole::Mrc)],
            high: vec![
                Recipient::OwningTeam,
                Recipient::Role(ReviewerRole::Mrc),
                Recipient::Role(ReviewerRole::Security),
            ],
            critical: vec![
                Recipient::OwningTeam,
                Recipient::Role(ReviewerRole::Security),
            ],
        }
    }
}

impl RecipientResolver for SeverityRouting {
    fn recipients_for(&self, severity: Severity) -> Vec<Recipient> {
        match severity {
            Severity::Low => self.low.clone(),
            Severity::Medium => self.medium.clone(),
            Severity::High => self.high.clone(),
            Severity::Critical => self.critical.clone(),
        }
    }
}

// ── Notifier ─────────────────────────────────────────────────────────

/// Fans a blocked decision out into notification intents.
pub struct PolicyNotifier<R = SeverityRouting> {
    routing: R,
}

impl PolicyNotifier<SeverityRouting> {
    pub fn new() -> Self {
        Self {
            routing: SeverityRouting::default(),
        }
    }
}

impl Default for PolicyNotifier<SeverityRouting> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RecipientResolver> PolicyNotifier<R> {
    pub fn with_routing(routing: R) -> Self {
        Self { routing }
    }

    /// One intent per (blocking violation, routed recipient), sorted
    /// by key and deduplicated. Overridden violations notify no one;
    /// an allowed decision produces nothing.
    pub fn intents_for(&self, decision: &PromotionDecision) -> Vec<NotificationIntent> {
        let mut intents = Vec::new();
        for violation in &decision.blocking {
            for recipient in self.routing.recipients_for(violation.severity) {
                let key =
                    NotificationIntent::key_for(&decision.version_id, &violation.policy_id, recipient);
                debug!(key = %key, severity = %violation.severity, "notification intent");
                intents.push(NotificationIntent {
                    key,
                    version_id: decision.version_id.clone(),
                    policy_id: violation.policy_id.clone(),
                    severity: violation.severity,
                    recipient,
                    message: format!(
                        "promotion of version {} blocked: {}",
                        decision.version_id, violation.message
                    ),
                });
            }
        }
        intents.sort_by(|a, b| a.key.cmp(&b.key));
        intents.dedup_by(|a, b| a.key == b.key);
        intents
    }
}
