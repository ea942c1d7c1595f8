//! Field rules for a contact submission.
//!
//! Every rule runs on every call; the result lists each violated field, not
//! only the first one. Budget has no rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::types::{ErrorMap, Field, SubmissionRecord};

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PROJECT_TYPE_REQUIRED: &str = "Please select a project type";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const MESSAGE_TOO_SHORT: &str = "Please provide a bit more detail (at least 20 characters)";

/// Minimum message length, in characters of the trimmed text.
pub const MESSAGE_MIN_CHARS: usize = 20;

/// Validate `record` and return the errors of every failing field.
///
/// An empty map means the record may be submitted.
pub fn validate_record(record: &SubmissionRecord) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if record.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if record.email.trim().is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !is_email_shape(&record.email) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }

    // A select with nothing chosen submits the empty value; whitespace is a
    // (bogus) choice, not an absence.
    if record.project_type.is_empty() {
        errors.insert(Field::ProjectType, PROJECT_TYPE_REQUIRED);
    }

    let message = record.message.trim();
    if message.is_empty() {
        errors.insert(Field::Message, MESSAGE_REQUIRED);
    } else if message.chars().count() < MESSAGE_MIN_CHARS {
        errors.insert(Field::Message, MESSAGE_TOO_SHORT);
    }

    errors
}

/// Syntactic `local@domain.tld` check. No DNS or deliverability lookup.
///
/// Applied to the raw value: surrounding whitespace makes an address invalid.
pub fn is_email_shape(value: &str) -> bool {
    static EMAIL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    EMAIL_RE.is_match(value)
}
