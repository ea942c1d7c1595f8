//! Shared deterministic types for the intake core.
//!
//! These types define the contract between the validator, the controller and
//! the presentation layer. They carry no I/O and serialise with the same keys
//! the contact form uses on the page (`projectType`, not `project_type`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};

/// One of the five contact form inputs.
///
/// Variant order is the canonical field order used for focus selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Budget,
    ProjectType,
    Message,
}

impl Field {
    /// Every field, in canonical order.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Budget,
        Field::ProjectType,
        Field::Message,
    ];

    /// Form key; doubles as the input element id.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Budget => "budget",
            Field::ProjectType => "projectType",
            Field::Message => "message",
        }
    }

    /// Id of the element carrying this field's error text.
    pub fn error_id(self) -> String {
        format!("{}-error", self.key())
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Budget => "Budget",
            Field::ProjectType => "Project Type",
            Field::Message => "Tell me about your project",
        }
    }

    /// Budget is the only optional input.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::Budget)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| anyhow!("unknown form field '{s}'"))
    }
}

/// Current values of the contact form.
///
/// Absence is always the empty string; no field is ever missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub budget: String,
    pub project_type: String,
    pub message: String,
}

impl SubmissionRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Budget => &self.budget,
            Field::ProjectType => &self.project_type,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Budget => &mut self.budget,
            Field::ProjectType => &mut self.project_type,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Field-level error messages.
///
/// Only fields currently in error are present. A field without an error is
/// absent from the map, never mapped to an empty message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<Field, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(Field, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Stage of the submission workflow.
///
/// Validation errors are not a phase: an invalid form is `Idle` with a
/// non-empty [`ErrorMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    /// The sink rejected the record. The record is kept for a retry.
    Failed { reason: String },
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Success => "success",
            Phase::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of everything the controller owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub record: SubmissionRecord,
    pub errors: ErrorMap,
    pub phase: Phase,
    /// Field that should receive input focus after the last rejected submit.
    pub focus: Option<Field>,
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self {
            record: SubmissionRecord::default(),
            errors: ErrorMap::new(),
            phase: Phase::Idle,
            focus: None,
        }
    }
}
