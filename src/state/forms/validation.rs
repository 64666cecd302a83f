//! Field validation rules.
//!
//! Rules run in a fixed order and the first failure wins:
//! required, email format, minimum length, maximum length, pattern, custom.
//! Empty optional fields skip every rule after `required`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::field::{empty_value_for, FieldKind, FieldSpec, FieldValue};

/// Field name to error message, holding only fields that failed.
pub type FieldErrors = BTreeMap<String, String>;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Validate one value against its field spec.
///
/// Returns the first failing rule's message, or `None` when valid.
pub fn validate(field: &FieldSpec, value: &FieldValue) -> Option<String> {
    if value.is_empty() {
        if field.required {
            return Some(format!("{} is required", field.label));
        }
        return None;
    }

    // Length and pattern rules see numbers and booleans as their text form
    let text = value.to_string();

    if field.kind == FieldKind::Email && !email_regex().is_match(&text) {
        return Some("Please enter a valid email address".to_string());
    }

    let rules = field.rules.as_ref()?;
    let length = text.chars().count();
    // Length rules apply to text only; a zero limit counts as unset
    let has_length = matches!(value, FieldValue::Text(_));

    if let Some(min) = rules.min_length.filter(|&min| has_length && min > 0) {
        if length < min {
            return Some(format!(
                "{} must be at least {} characters long",
                field.label, min
            ));
        }
    }

    if let Some(max) = rules.max_length.filter(|&max| has_length && max > 0) {
        if length > max {
            return Some(format!(
                "{} must be no more than {} characters long",
                field.label, max
            ));
        }
    }

    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(&text) {
            return Some(format!("{} format is invalid", field.label));
        }
    }

    rules
        .custom
        .as_ref()
        .and_then(|custom| custom(value))
        .filter(|message| !message.is_empty())
}

/// Validate a set of fields, keeping only the failures.
///
/// A field missing from `values` is checked as its kind's empty value.
pub fn validate_set<'a>(
    fields: impl IntoIterator<Item = &'a FieldSpec>,
    values: &BTreeMap<String, FieldValue>,
) -> FieldErrors {
    fields
        .into_iter()
        .filter_map(|field| {
            let error = match values.get(&field.name) {
                Some(value) => validate(field, value),
                None => validate(field, &empty_value_for(field.kind)),
            };
            error.map(|message| (field.name.clone(), message))
        })
        .collect()
}
