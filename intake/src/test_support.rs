//! Test-only helpers: deterministic records, sinks and clocks.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::controller::IntakeController;
use crate::core::types::{Field, SubmissionRecord};
use crate::io::clock::Clock;
use crate::io::sink::SubmissionSink;

/// Build a record with an empty budget.
pub fn record(name: &str, email: &str, project_type: &str, message: &str) -> SubmissionRecord {
    SubmissionRecord {
        name: name.to_string(),
        email: email.to_string(),
        budget: String::new(),
        project_type: project_type.to_string(),
        message: message.to_string(),
    }
}

/// A record that passes every rule.
pub fn valid_record() -> SubmissionRecord {
    record(
        "Ann",
        "ann@example.com",
        "new-website",
        "This is a sufficiently long project description.",
    )
}

/// Type every field of `record` into `ctrl`, in canonical order.
pub fn fill<S: SubmissionSink, C: Clock>(ctrl: &IntakeController<S, C>, record: &SubmissionRecord) {
    for field in Field::ALL {
        ctrl.set_field(field, record.get(field));
    }
}

/// Sink that keeps every delivered record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl RecordingSink {
    pub fn delivered(&self) -> Vec<SubmissionRecord> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SubmissionSink for RecordingSink {
    async fn deliver(&self, record: &SubmissionRecord) -> Result<()> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Sink that rejects every record with a fixed reason.
#[derive(Debug, Clone)]
pub struct FailingSink {
    reason: String,
}

impl FailingSink {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl SubmissionSink for FailingSink {
    async fn deliver(&self, _record: &SubmissionRecord) -> Result<()> {
        Err(anyhow!("{}", self.reason))
    }
}

/// Clock that records each requested delay and resolves immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingClock {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.slept
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
