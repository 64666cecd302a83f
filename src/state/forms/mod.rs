//! Form domain layer
//!
//! One engine drives both single-page forms and multi-step wizards:
//! - `field`: field specs, kinds and values
//! - `schema`: flat/stepped schemas and JSON schema documents
//! - `validation`: per-field rules and step-wide validation
//! - `form_state`: the state machine (change, blur, next, previous, submit, reset)
//! - `submission`: hands validated values to the caller's submit handler
//! - `options`: labels, flags and callbacks supplied by the caller

use std::collections::BTreeMap;

mod field;
mod form_state;
mod options;
mod schema;
mod submission;
mod validation;

/// Current value of every field, keyed by field name
pub type FormValues = BTreeMap<String, FieldValue>;

pub use field::{
    empty_value_for, CustomRule, FieldKind, FieldSpec, FieldValue, SelectOption, ValidationRules,
};
pub use form_state::{FormEngine, FormState, StepOutcome, SubmitOutcome};
pub use options::{FormCallbacks, FormOptions, ResetCallback, StepChangeCallback};
pub use schema::{
    FieldDocument, FormSchema, RulesDocument, SchemaDocument, SchemaError, StepDocument, StepSpec,
};
pub use submission::{submit_fn, FnSubmitHandler, SubmissionController, SubmitHandler};
pub use validation::{validate, validate_set, FieldErrors};

#[cfg(test)]
pub use submission::MockSubmitHandler;
