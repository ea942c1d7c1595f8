//! Accessibility view model for the contact form.
//!
//! Built solely from a [`FormSnapshot`]. The presentation layer renders what
//! this module says; it never decides on its own which fields to announce or
//! where to put focus.

use serde::Serialize;

use crate::core::options::options_for;
use crate::core::types::{Field, FormSnapshot, Phase};

pub const SUBMIT_LABEL: &str = "Send Message";
pub const SUBMITTING_LABEL: &str = "Sending...";

/// Kind of input element rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Text,
    Email,
    Select,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    /// Input id and name.
    pub key: &'static str,
    pub label: &'static str,
    pub control: Control,
    pub placeholder: Option<&'static str>,
    pub required: bool,
    pub value: String,
    /// Drives `aria-invalid`.
    pub invalid: bool,
    /// Id of the error element; drives `aria-describedby`.
    pub error_id: Option<String>,
    /// Error text, announced with `role="alert"`.
    pub error: Option<String>,
    pub options: Vec<OptionView>,
    pub autofocus: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitView {
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

/// Panel shown in place of, or above, the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub kind: &'static str,
    pub role: &'static str,
    pub live: &'static str,
    pub heading: &'static str,
    pub body: String,
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub phase: &'static str,
    pub show_form: bool,
    pub fields: Vec<FieldView>,
    pub submit: SubmitView,
    pub focus: Option<&'static str>,
    pub notice: Option<NoticeView>,
}

/// Project the controller state onto the page.
pub fn form_view(snapshot: &FormSnapshot) -> FormView {
    let submitting = snapshot.phase == Phase::Submitting;
    let fields = Field::ALL
        .into_iter()
        .map(|field| field_view(snapshot, field, submitting))
        .collect();

    FormView {
        phase: snapshot.phase.as_str(),
        show_form: snapshot.phase != Phase::Success,
        fields,
        submit: SubmitView {
            label: if submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
            disabled: submitting,
            busy: submitting,
        },
        focus: snapshot.focus.map(Field::key),
        notice: notice(&snapshot.phase),
    }
}

fn field_view(snapshot: &FormSnapshot, field: Field, submitting: bool) -> FieldView {
    let value = snapshot.record.get(field);
    let error = snapshot.errors.get(field).map(str::to_string);
    let options = options_for(field)
        .unwrap_or_default()
        .iter()
        .map(|option| OptionView {
            value: option.value,
            label: option.label,
            selected: option.value == value,
        })
        .collect();

    FieldView {
        key: field.key(),
        label: field.label(),
        control: control(field),
        placeholder: placeholder(field),
        required: field.is_required(),
        value: value.to_string(),
        invalid: error.is_some(),
        error_id: error.as_ref().map(|_| field.error_id()),
        error,
        options,
        autofocus: snapshot.focus == Some(field),
        disabled: submitting,
    }
}

fn control(field: Field) -> Control {
    match field {
        Field::Name => Control::Text,
        Field::Email => Control::Email,
        Field::Budget | Field::ProjectType => Control::Select,
        Field::Message => Control::Textarea,
    }
}

fn placeholder(field: Field) -> Option<&'static str> {
    match field {
        Field::Name => Some("Your name"),
        Field::Email => Some("your@email.com"),
        Field::Message => Some("Describe your project, goals, and timeline..."),
        Field::Budget | Field::ProjectType => None,
    }
}

fn notice(phase: &Phase) -> Option<NoticeView> {
    match phase {
        Phase::Success => Some(NoticeView {
            kind: "success",
            role: "status",
            live: "polite",
            heading: "Message sent!",
            body: "Thanks for reaching out! I'll get back to you within 24 hours.".to_string(),
            action: "Send another message",
        }),
        Phase::Failed { reason } => Some(NoticeView {
            kind: "error",
            role: "alert",
            live: "assertive",
            heading: "Message not sent",
            body: format!("Something went wrong while sending your message: {reason}"),
            action: "Try again",
        }),
        Phase::Idle | Phase::Submitting => None,
    }
}
