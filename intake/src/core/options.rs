//! Fixed choices offered by the form's select inputs.
//!
//! The first entry of each table is the placeholder; its value is the empty
//! string, which is what "nothing selected" submits.

use serde::Serialize;

use crate::core::types::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

pub const BUDGET_OPTIONS: &[SelectOption] = &[
    opt("", "Select your budget range"),
    opt("under-5k", "Under $5,000"),
    opt("5k-10k", "$5,000 - $10,000"),
    opt("10k-25k", "$10,000 - $25,000"),
    opt("25k-plus", "$25,000+"),
    opt("not-sure", "Not sure yet"),
];

pub const PROJECT_TYPE_OPTIONS: &[SelectOption] = &[
    opt("", "Select project type"),
    opt("new-website", "New Website"),
    opt("redesign", "Website Redesign"),
    opt("web-app", "Web Application"),
    opt("landing-page", "Landing Page"),
    opt("ecommerce", "E-commerce"),
    opt("other", "Other"),
];

/// Option table for a select field; `None` for free-text fields.
pub fn options_for(field: Field) -> Option<&'static [SelectOption]> {
    match field {
        Field::Budget => Some(BUDGET_OPTIONS),
        Field::ProjectType => Some(PROJECT_TYPE_OPTIONS),
        Field::Name | Field::Email | Field::Message => None,
    }
}

/// Display label for a category code, if `field` is a select and knows `value`.
pub fn label_for(field: Field, value: &str) -> Option<&'static str> {
    options_for(field)?
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label)
}
