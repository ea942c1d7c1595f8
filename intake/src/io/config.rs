//! Intake configuration stored under `.intake/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config location relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".intake/config.toml";

/// Intake configuration (TOML).
///
/// Missing fields default to the timings the contact form ships with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntakeConfig {
    /// Simulated round trip after handing the record to the sink.
    pub submit_delay_ms: u64,

    /// Delay between entering `success` and clearing the form values.
    pub clear_delay_ms: u64,

    pub sink: SinkConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Emit each record as a structured log event.
    Log,
    /// Append each record as a JSON line to `outbox_path`.
    Outbox,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub outbox_path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Log,
            outbox_path: PathBuf::from(".intake/outbox.jsonl"),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1000,
            clear_delay_ms: 500,
            sink: SinkConfig::default(),
        }
    }
}

impl IntakeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sink.kind == SinkKind::Outbox && self.sink.outbox_path.as_os_str().is_empty() {
            return Err(anyhow!("sink.outbox_path must be set when sink.kind = \"outbox\""));
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `IntakeConfig::default()`.
pub fn load_config(path: &Path) -> Result<IntakeConfig> {
    if !path.exists() {
        let cfg = IntakeConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: IntakeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &IntakeConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
