//! Form schema: flat field lists and ordered wizard steps

use super::field::{FieldKind, FieldSpec, FieldValue, SelectOption, ValidationRules};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An ordered group of fields shown together in a wizard
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl StepSpec {
    pub fn new(title: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            fields,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Either a single page of fields or an ordered list of steps.
///
/// Everything downstream asks for the fields of a step index, so a flat
/// form behaves as one implicit step.
#[derive(Debug, Clone)]
pub enum FormSchema {
    Flat(Vec<FieldSpec>),
    Stepped(Vec<StepSpec>),
}

impl FormSchema {
    pub fn is_stepped(&self) -> bool {
        matches!(self, FormSchema::Stepped(_))
    }

    /// Number of steps; always 1 for flat forms
    pub fn total_steps(&self) -> usize {
        match self {
            FormSchema::Flat(_) => 1,
            FormSchema::Stepped(steps) => steps.len(),
        }
    }

    /// Fields active for `index`. Out-of-range indexes yield no fields.
    pub fn fields_for_step(&self, index: usize) -> &[FieldSpec] {
        match self {
            FormSchema::Flat(fields) => fields,
            FormSchema::Stepped(steps) => steps
                .get(index)
                .map(|s| s.fields.as_slice())
                .unwrap_or_default(),
        }
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        match self {
            FormSchema::Flat(_) => None,
            FormSchema::Stepped(steps) => steps.get(index),
        }
    }

    /// Every field across every step, in declaration order
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        let (flat, steps) = match self {
            FormSchema::Flat(fields) => (fields.as_slice(), &[][..]),
            FormSchema::Stepped(steps) => (&[][..], steps.as_slice()),
        };
        flat.iter()
            .chain(steps.iter().flat_map(|s| s.fields.iter()))
    }

    /// Look a field up by name regardless of which step owns it
    pub fn find_field(&self, name: &str) -> Option<&FieldSpec> {
        self.all_fields().find(|f| f.name == name)
    }

    /// Load a schema from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        FormSchema::try_from(document)
    }
}

/// Errors raised while turning a schema document into a [`FormSchema`]
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema must define exactly one of `fields` or `steps`")]
    AmbiguousShape,

    #[error("field `{field}` has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("select field `{0}` has no options")]
    MissingOptions(String),

    #[error("checkbox field `{0}` must have a boolean default")]
    CheckboxDefault(String),
}

/// Serialized rule set. Custom rules only exist in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesDocument {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
}

/// Serialized field as found in schema files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDocument {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(alias = "validationRules")]
    pub validation: Option<RulesDocument>,
    pub default_value: Option<FieldValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDocument {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDocument>,
}

/// Top-level schema file: either `fields` or `steps`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub fields: Option<Vec<FieldDocument>>,
    pub steps: Option<Vec<StepDocument>>,
}

impl TryFrom<FieldDocument> for FieldSpec {
    type Error = SchemaError;

    fn try_from(doc: FieldDocument) -> Result<Self, Self::Error> {
        if doc.kind == FieldKind::Select && doc.options.is_empty() {
            return Err(SchemaError::MissingOptions(doc.name));
        }
        if doc.kind == FieldKind::Checkbox
            && !matches!(doc.default_value, None | Some(FieldValue::Bool(_)))
        {
            return Err(SchemaError::CheckboxDefault(doc.name));
        }

        let rules = doc
            .validation
            .map(|rules| -> Result<ValidationRules, SchemaError> {
                let pattern = rules
                    .pattern
                    .as_deref()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|source| SchemaError::InvalidPattern {
                        field: doc.name.clone(),
                        source,
                    })?;
                Ok(ValidationRules {
                    min_length: rules.min_length,
                    max_length: rules.max_length,
                    pattern,
                    custom: None,
                })
            })
            .transpose()?;

        Ok(FieldSpec {
            name: doc.name,
            label: doc.label,
            kind: doc.kind,
            required: doc.required,
            placeholder: doc.placeholder,
            options: doc.options,
            rules,
            default_value: doc.default_value,
        })
    }
}

fn convert_fields(fields: Vec<FieldDocument>) -> Result<Vec<FieldSpec>, SchemaError> {
    fields.into_iter().map(FieldSpec::try_from).collect()
}

impl TryFrom<SchemaDocument> for FormSchema {
    type Error = SchemaError;

    fn try_from(doc: SchemaDocument) -> Result<Self, Self::Error> {
        match (doc.fields, doc.steps) {
            (Some(fields), None) => Ok(FormSchema::Flat(convert_fields(fields)?)),
            (None, Some(steps)) => {
                let steps = steps
                    .into_iter()
                    .map(|step| {
                        Ok(StepSpec {
                            title: step.title,
                            description: step.description,
                            fields: convert_fields(step.fields)?,
                        })
                    })
                    .collect::<Result<Vec<_>, SchemaError>>()?;
                Ok(FormSchema::Stepped(steps))
            }
            _ => Err(SchemaError::AmbiguousShape),
        }
    }
}
