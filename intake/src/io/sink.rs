//! Destinations for validated contact requests.
//!
//! The [`SubmissionSink`] trait decouples the controller from the transport.
//! The controller hands each valid record to its sink exactly once per
//! successful submit and consults the returned `Result` to pick the next phase.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::core::options::label_for;
use crate::core::types::{Field, SubmissionRecord};
use crate::io::config::{SinkConfig, SinkKind};

/// Receiver of validated submissions.
pub trait SubmissionSink: Send + Sync {
    /// Accept `record`. An `Err` moves the controller to the failed phase.
    fn deliver(&self, record: &SubmissionRecord) -> impl Future<Output = Result<()>> + Send;
}

/// Sink that records each request as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    async fn deliver(&self, record: &SubmissionRecord) -> Result<()> {
        info!(
            name = %record.name,
            email = %record.email,
            budget = label_for(Field::Budget, &record.budget).unwrap_or(record.budget.as_str()),
            project_type = label_for(Field::ProjectType, &record.project_type)
                .unwrap_or(record.project_type.as_str()),
            message_chars = record.message.trim().chars().count(),
            "contact request received"
        );
        Ok(())
    }
}

/// Sink that appends one JSON line per request to a file.
#[derive(Debug, Clone)]
pub struct OutboxSink {
    path: PathBuf,
}

impl OutboxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubmissionSink for OutboxSink {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn deliver(&self, record: &SubmissionRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("serialize submission")?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create outbox dir {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("open outbox {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("append to outbox {}", self.path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("flush outbox {}", self.path.display()))?;

        debug!(bytes = line.len(), "appended submission to outbox");
        Ok(())
    }
}

/// Sink selected by [`SinkConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredSink {
    Log(LogSink),
    Outbox(OutboxSink),
}

impl ConfiguredSink {
    pub fn from_config(cfg: &SinkConfig) -> Self {
        match cfg.kind {
            SinkKind::Log => ConfiguredSink::Log(LogSink),
            SinkKind::Outbox => ConfiguredSink::Outbox(OutboxSink::new(&cfg.outbox_path)),
        }
    }
}

impl SubmissionSink for ConfiguredSink {
    async fn deliver(&self, record: &SubmissionRecord) -> Result<()> {
        match self {
            ConfiguredSink::Log(sink) => sink.deliver(record).await,
            ConfiguredSink::Outbox(sink) => sink.deliver(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_record;

    #[tokio::test]
    async fn outbox_appends_one_line_per_record() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sink = OutboxSink::new(temp.path().join("queue").join("outbox.jsonl"));

        let first = valid_record();
        let mut second = valid_record();
        second.name = "Bea".to_string();
        sink.deliver(&first).await.expect("first");
        sink.deliver(&second).await.expect("second");

        let contents = std::fs::read_to_string(sink.path()).expect("read outbox");
        let records: Vec<SubmissionRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("parse line"))
            .collect();
        assert_eq!(records, vec![first, second]);
    }

    #[tokio::test]
    async fn outbox_reports_unwritable_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        // A directory cannot be opened for appending.
        let sink = OutboxSink::new(temp.path());
        let err = sink.deliver(&valid_record()).await.unwrap_err();
        assert!(format!("{err:#}").contains("open outbox"));
    }

    #[tokio::test]
    async fn configured_sink_follows_kind() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = SinkConfig {
            kind: SinkKind::Outbox,
            outbox_path: temp.path().join("outbox.jsonl"),
        };
        let sink = ConfiguredSink::from_config(&cfg);
        assert!(matches!(sink, ConfiguredSink::Outbox(_)));
        sink.deliver(&valid_record()).await.expect("deliver");
        assert!(cfg.outbox_path.exists());

        let log = ConfiguredSink::from_config(&SinkConfig::default());
        assert!(matches!(log, ConfiguredSink::Log(_)));
        log.deliver(&valid_record()).await.expect("log deliver");
    }
}
