//! Recording sinks for testing service wiring.

use std::sync::RwLock;

use async_trait::async_trait;

use modelgate_notify::NotificationIntent;
use modelgate_types::DecisionRecorded;

use crate::error::GateError;
use crate::traits::{AuditSink, NotificationSink};

/// Notification sink that records every delivered intent.
///
/// Can be configured to fail every delivery, for exercising the
/// log-and-continue path.
pub struct RecordingNotificationSink {
    delivered: RwLock<Vec<NotificationIntent>>,
    fail: bool,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self {
            delivered: RwLock::new(Vec::new()),
            fail: false,
        }
    }

    /// A sink that rejects every delivery.
    pub fn failing() -> Self {
        Self {
            delivered: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    /// Everything delivered so far, in delivery order.
    pub fn delivered(&self) -> Vec<NotificationIntent> {
        self.delivered.read().map(|d| d.clone()).unwrap_or_default()
    }
}

impl Default for RecordingNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), GateError> {
        if self.fail {
            return Err(GateError::Delivery {
                key: intent.key.clone(),
                reason: "sink configured to fail".into(),
            });
        }
        self.delivered
            .write()
            .map_err(|_| GateError::LockPoisoned)?
            .push(intent.clone());
        Ok(())
    }
}

/// Audit sink that records every decision record.
pub struct RecordingAuditSink {
    records: RwLock<Vec<DecisionRecorded>>,
    fail: bool,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail: false,
        }
    }

    /// A sink that rejects every record.
    pub fn failing() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<DecisionRecorded> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for RecordingAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, record: &DecisionRecorded) -> Result<(), GateError> {
        if self.fail {
            return Err(GateError::Audit("sink configured to fail".into()));
        }
        self.records
            .write()
            .map_err(|_| GateError::LockPoisoned)?
            .push(record.clone());
        Ok(())
    }
}
