//! Form field value objects

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of input a field collects.
///
/// The kind drives the empty-value policy and the built-in email check;
/// how a kind is drawn is left to the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Textarea,
    Select,
    Checkbox,
    Date,
}

impl FieldKind {
    pub fn is_multiline(&self) -> bool {
        matches!(self, FieldKind::Textarea)
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl FieldValue {
    /// Empty means blank text or an unchecked box. Numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::Number(_) => false,
        }
    }

    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Get the checkbox state (text and numbers read as unchecked)
    pub fn as_bool(&self) -> bool {
        matches!(self, FieldValue::Bool(true))
    }

    /// Push a character onto the value; numbers continue as text
    pub fn push_char(&mut self, c: char) {
        match self {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Number(n) => {
                let mut s = n.to_string();
                s.push(c);
                *self = FieldValue::Text(s);
            }
            FieldValue::Bool(_) => {
                // Checkboxes are toggled, not typed into
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match self {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Number(n) => {
                let mut s = n.to_string();
                s.pop();
                *self = FieldValue::Text(s);
            }
            FieldValue::Bool(_) => {}
        }
    }

    /// Flip a checkbox value
    pub fn toggle(&mut self) {
        *self = FieldValue::Bool(!self.as_bool());
    }
}

/// Default value for a field that has neither an initial nor a default value.
pub fn empty_value_for(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Checkbox => FieldValue::Bool(false),
        _ => FieldValue::Text(String::new()),
    }
}

/// A caller-supplied rule returning an error message for invalid values.
pub type CustomRule = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

/// Extra validation rules attached to a field
#[derive(Clone, Default)]
pub struct ValidationRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub custom: Option<CustomRule>,
}

impl fmt::Debug for ValidationRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRules")
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl ValidationRules {
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn custom<F>(mut self, rule: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(rule));
        self
    }
}

/// One selectable entry of a `select` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Describes a single form field: its name, kind and rules
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
    pub rules: Option<ValidationRules>,
    pub default_value: Option<FieldValue>,
}

impl FieldSpec {
    /// Create a new optional field of the given kind
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            placeholder: None,
            options: Vec::new(),
            rules: None,
            default_value: None,
        }
    }

    /// Create a new text field
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Create a new email field
    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    /// Create a new checkbox field
    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    /// Create a new select field with its options
    pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::Select)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Value used at mount and on reset when no initial value applies
    pub fn default_or_empty(&self) -> FieldValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| empty_value_for(self.kind))
    }

    /// Label of the option currently selected by `value`, if any
    pub fn option_label(&self, value: &FieldValue) -> Option<&str> {
        let current = value.as_text();
        self.options
            .iter()
            .find(|o| o.value == current)
            .map(|o| o.label.as_str())
    }

    /// Get the display value for rendering
    pub fn display_value(&self, value: &FieldValue) -> String {
        match self.kind {
            FieldKind::Checkbox => {
                if value.as_bool() {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::Password => "•".repeat(value.to_string().chars().count()),
            FieldKind::Select => self
                .option_label(value)
                .map(str::to_string)
                .unwrap_or_default(),
            _ => value.to_string(),
        }
    }
}
