//! Form state machine shared by flat forms and multi-step wizards

use std::collections::BTreeSet;

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::field::{FieldSpec, FieldValue};
use super::options::{FormCallbacks, FormOptions};
use super::schema::{FormSchema, StepSpec};
use super::submission::SubmissionController;
use super::validation::{validate, validate_set, FieldErrors};
use super::FormValues;

/// Mutable state of one running form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FieldErrors,
    pub touched: BTreeSet<String>,
    pub current_step: usize,
}

impl FormState {
    /// Build the starting state: initial value, then default, then the
    /// kind's empty value, for every field of every step.
    pub fn initialize(schema: &FormSchema, initial_values: &FormValues) -> Self {
        let values = schema
            .all_fields()
            .map(|field| {
                let value = initial_values
                    .get(&field.name)
                    .cloned()
                    .unwrap_or_else(|| field.default_or_empty());
                (field.name.clone(), value)
            })
            .collect();
        Self {
            values,
            ..Self::default()
        }
    }
}

/// Result of a `next`/`previous` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step index changed to the contained value
    Moved(usize),
    /// Validation failed on the current step
    Blocked,
    /// Nothing to do: first/last step reached, or the form is flat
    Unchanged,
}

/// Result of a `submit` request
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A wizard was not on its last step and moved forward instead
    Advanced(usize),
    /// Validation failed; nothing was sent
    Blocked,
    /// The submit handler was spawned with the full value map
    Dispatched(JoinHandle<()>),
    /// Values were valid but no async runtime was available to run the handler
    Unavailable,
}

/// Drives a form through edits, navigation, submission and reset.
///
/// State is initialized once in [`FormEngine::new`] and only changes through
/// the transition methods.
#[derive(Debug)]
pub struct FormEngine {
    id: Uuid,
    schema: FormSchema,
    options: FormOptions,
    callbacks: FormCallbacks,
    submission: SubmissionController,
    state: FormState,
}

impl FormEngine {
    /// Mount a form: values come from initial values, defaults, then empties
    pub fn new(schema: FormSchema, options: FormOptions, callbacks: FormCallbacks) -> Self {
        let id = Uuid::new_v4();
        let state = FormState::initialize(&schema, &options.initial_values);
        let submission = SubmissionController::new(callbacks.on_submit.clone());
        tracing::debug!(
            form_id = %id,
            fields = state.values.len(),
            steps = schema.total_steps(),
            "form mounted"
        );
        Self {
            id,
            schema,
            options,
            callbacks,
            submission,
            state,
        }
    }

    // Read-only accessors

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.state.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.values.get(name)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn touched(&self) -> &BTreeSet<String> {
        &self.state.touched
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.schema.total_steps()
    }

    pub fn is_stepped(&self) -> bool {
        self.schema.is_stepped()
    }

    pub fn is_first_step(&self) -> bool {
        self.state.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step + 1 >= self.total_steps()
    }

    /// Fields shown on the current step
    pub fn current_fields(&self) -> &[FieldSpec] {
        self.schema.fields_for_step(self.state.current_step)
    }

    pub fn current_step_spec(&self) -> Option<&StepSpec> {
        self.schema.step(self.state.current_step)
    }

    /// The error to display for `name`: only once the field is touched
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.state.touched.contains(name) {
            self.state.errors.get(name).map(String::as_str)
        } else {
            None
        }
    }

    /// Update the caller-owned loading flag
    pub fn set_loading(&mut self, loading: bool) {
        self.options.loading = loading;
    }

    // Transitions

    /// Store a new value. Any error on the field is cleared, not re-checked.
    pub fn change(&mut self, name: &str, value: impl Into<FieldValue>) {
        let Some(slot) = self.state.values.get_mut(name) else {
            tracing::warn!(form_id = %self.id, field = name, "change for unknown field ignored");
            return;
        };
        *slot = value.into();
        if self.state.errors.remove(name).is_some() {
            tracing::debug!(form_id = %self.id, field = name, "error cleared on edit");
        }
    }

    /// Mark a field touched and validate it against the whole schema
    pub fn blur(&mut self, name: &str) {
        self.state.touched.insert(name.to_string());

        let Some(field) = self.schema.find_field(name) else {
            tracing::warn!(form_id = %self.id, field = name, "blur for unknown field");
            return;
        };
        let empty;
        let value = match self.state.values.get(name) {
            Some(value) => value,
            None => {
                empty = field.default_or_empty();
                &empty
            }
        };

        match validate(field, value) {
            Some(error) => {
                tracing::debug!(form_id = %self.id, field = name, %error, "field invalid");
                self.state.errors.insert(name.to_string(), error);
            }
            None => {
                self.state.errors.remove(name);
            }
        }
    }

    /// Move to the next step if the current one validates
    pub fn next(&mut self) -> StepOutcome {
        if !self.is_stepped() {
            return StepOutcome::Unchanged;
        }
        if !self.validate_current_step() {
            return StepOutcome::Blocked;
        }
        let last = self.total_steps().saturating_sub(1);
        let target = (self.state.current_step + 1).min(last);
        self.move_to(target)
    }

    /// Move back one step. Never validates and never touches errors.
    pub fn previous(&mut self) -> StepOutcome {
        if !self.is_stepped() {
            return StepOutcome::Unchanged;
        }
        let target = self.state.current_step.saturating_sub(1);
        self.move_to(target)
    }

    /// Submit from the last step (or a flat form); earlier steps advance instead
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_stepped() && !self.is_last_step() {
            return match self.next() {
                StepOutcome::Moved(step) => SubmitOutcome::Advanced(step),
                StepOutcome::Blocked => SubmitOutcome::Blocked,
                StepOutcome::Unchanged => SubmitOutcome::Advanced(self.state.current_step),
            };
        }

        if !self.validate_current_step() {
            tracing::debug!(form_id = %self.id, "submit blocked by validation");
            return SubmitOutcome::Blocked;
        }

        match self
            .submission
            .dispatch(self.id, self.state.values.clone())
        {
            Some(handle) => SubmitOutcome::Dispatched(handle),
            None => SubmitOutcome::Unavailable,
        }
    }

    /// Restore defaults (initial values are not reapplied) and clear everything
    pub fn reset(&mut self) {
        self.state = FormState::initialize(&self.schema, &FormValues::new());
        tracing::debug!(form_id = %self.id, "form reset");
        if let Some(on_reset) = self.callbacks.on_reset.as_mut() {
            on_reset();
        }
    }

    /// Validate the visible step, recording results. Failures also mark
    /// every field of the step as touched.
    fn validate_current_step(&mut self) -> bool {
        let fields = self.schema.fields_for_step(self.state.current_step);
        let errors = validate_set(fields, &self.state.values);

        for field in fields {
            self.state.errors.remove(&field.name);
        }
        if errors.is_empty() {
            return true;
        }

        tracing::debug!(
            form_id = %self.id,
            step = self.state.current_step,
            invalid = errors.len(),
            "step validation failed"
        );
        self.state
            .touched
            .extend(fields.iter().map(|f| f.name.clone()));
        self.state.errors.extend(errors);
        false
    }

    fn move_to(&mut self, target: usize) -> StepOutcome {
        if target == self.state.current_step {
            return StepOutcome::Unchanged;
        }
        self.state.current_step = target;
        let total = self.total_steps();
        tracing::debug!(form_id = %self.id, step = target, total, "step changed");
        if let Some(on_step_change) = self.callbacks.on_step_change.as_mut() {
            on_step_change(target, total, &self.state.values);
        }
        StepOutcome::Moved(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::{FieldKind, ValidationRules};
    use crate::state::forms::submission::{submit_fn, MockSubmitHandler, SubmitHandler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn noop_handler() -> Arc<dyn SubmitHandler> {
        submit_fn(|_| async { anyhow::Ok(()) })
    }

    fn flat_engine(fields: Vec<FieldSpec>) -> FormEngine {
        FormEngine::new(
            FormSchema::Flat(fields),
            FormOptions::default(),
            FormCallbacks::new(noop_handler()),
        )
    }

    fn wizard_schema() -> FormSchema {
        FormSchema::Stepped(vec![
            StepSpec::new("Personal", vec![FieldSpec::text("name", "Name").required()]),
            StepSpec::new(
                "Account",
                vec![
                    FieldSpec::text("username", "Username").required(),
                    FieldSpec::checkbox("terms", "Terms").required(),
                ],
            ),
            StepSpec::new(
                "Preferences",
                vec![FieldSpec::checkbox("newsletter", "Newsletter").with_default(true)],
            ),
        ])
    }

    fn wizard_engine() -> FormEngine {
        FormEngine::new(
            wizard_schema(),
            FormOptions::default(),
            FormCallbacks::new(noop_handler()),
        )
    }

    mod initialization {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_values_cover_every_step() {
            let engine = wizard_engine();
            let names: Vec<_> = engine.values().keys().map(String::as_str).collect();
            assert_eq!(names, ["name", "newsletter", "terms", "username"]);
            assert_eq!(engine.value("terms"), Some(&FieldValue::Bool(false)));
            assert_eq!(engine.value("newsletter"), Some(&FieldValue::Bool(true)));
            assert_eq!(engine.value("name"), Some(&FieldValue::from("")));
        }

        #[test]
        fn test_initial_values_override_defaults() {
            let mut options = FormOptions::default();
            options
                .initial_values
                .insert("a".to_string(), FieldValue::Number(5.0));
            let engine = FormEngine::new(
                FormSchema::Flat(vec![FieldSpec::new("a", "A", FieldKind::Number).with_default(1_i64)]),
                options,
                FormCallbacks::new(noop_handler()),
            );
            assert_eq!(engine.value("a"), Some(&FieldValue::Number(5.0)));
        }

        #[test]
        fn test_initialize_is_repeatable() {
            let schema = wizard_schema();
            let first = FormState::initialize(&schema, &FormValues::new());
            let second = FormState::initialize(&schema, &FormValues::new());
            assert_eq!(first, second);
        }

        #[test]
        fn test_fresh_state_is_clean() {
            let engine = wizard_engine();
            assert!(engine.errors().is_empty());
            assert!(engine.touched().is_empty());
            assert_eq!(engine.current_step(), 0);
            assert_eq!(engine.total_steps(), 3);
        }

        #[test]
        fn test_duplicate_names_keep_other_fields() {
            let engine = flat_engine(vec![
                FieldSpec::text("dup", "First").with_default("one"),
                FieldSpec::text("other", "Other").with_default("kept"),
                FieldSpec::text("dup", "Second").with_default("two"),
            ]);
            assert_eq!(engine.value("other"), Some(&FieldValue::from("kept")));
            assert_eq!(engine.values().len(), 2);
        }
    }

    mod change_and_blur {
        use super::*;
        use pretty_assertions::assert_eq;

        fn counted_field(calls: Arc<AtomicUsize>) -> FieldSpec {
            FieldSpec::text("nick", "Nick").with_rules(ValidationRules::default().custom(
                move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    None
                },
            ))
        }

        #[test]
        fn test_change_never_validates_blur_always_does() {
            let calls = Arc::new(AtomicUsize::new(0));
            let mut engine = flat_engine(vec![counted_field(calls.clone())]);

            engine.change("nick", "neo");
            engine.change("nick", "trinity");
            assert_eq!(calls.load(Ordering::SeqCst), 0);

            engine.blur("nick");
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            engine.blur("nick");
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }

        #[test]
        fn test_email_scenario() {
            let mut engine = flat_engine(vec![FieldSpec::email("email", "Email").required()]);

            engine.change("email", "bad");
            assert!(engine.errors().is_empty());

            engine.blur("email");
            assert_eq!(
                engine.errors().get("email").map(String::as_str),
                Some("Please enter a valid email address")
            );
            assert!(engine.touched().contains("email"));

            engine.change("email", "a@b.com");
            engine.blur("email");
            assert!(engine.errors().get("email").is_none());
        }

        #[test]
        fn test_change_clears_error_without_revalidating() {
            let mut engine = flat_engine(vec![FieldSpec::email("email", "Email")]);
            engine.change("email", "bad");
            engine.blur("email");
            assert!(engine.errors().contains_key("email"));

            engine.change("email", "still bad");
            assert!(engine.errors().is_empty());
        }

        #[test]
        fn test_change_unknown_field_is_ignored() {
            let mut engine = flat_engine(vec![FieldSpec::text("a", "A")]);
            engine.change("zzz", "x");
            assert_eq!(engine.values().len(), 1);
            assert!(engine.value("zzz").is_none());
        }

        #[test]
        fn test_blur_finds_fields_on_other_steps() {
            let mut engine = wizard_engine();
            assert_eq!(engine.current_step(), 0);
            engine.blur("username");
            assert_eq!(
                engine.errors().get("username").map(String::as_str),
                Some("Username is required")
            );
        }

        #[test]
        fn test_visible_error_requires_touch() {
            let mut engine = wizard_engine();
            engine.next();
            engine.change("name", "Ann");
            engine.blur("username");
            assert_eq!(engine.visible_error("username"), Some("Username is required"));
            assert_eq!(engine.visible_error("terms"), None);
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_next_blocked_on_invalid_step() {
            let mut engine = wizard_engine();
            assert_eq!(engine.next(), StepOutcome::Blocked);
            assert_eq!(engine.current_step(), 0);

            let mut expected = FieldErrors::new();
            expected.insert("name".to_string(), "Name is required".to_string());
            assert_eq!(engine.errors(), &expected);
            assert!(engine.touched().contains("name"));
        }

        #[test]
        fn test_next_ignores_later_steps() {
            let mut engine = wizard_engine();
            engine.change("name", "Ann");
            assert_eq!(engine.next(), StepOutcome::Moved(1));
            assert!(engine.errors().is_empty());
            assert!(!engine.touched().contains("username"));
        }

        #[test]
        fn test_next_reports_every_invalid_field_of_step() {
            let mut engine = wizard_engine();
            engine.change("name", "Ann");
            engine.next();
            assert_eq!(engine.next(), StepOutcome::Blocked);
            let keys: Vec<_> = engine.errors().keys().map(String::as_str).collect();
            assert_eq!(keys, ["terms", "username"]);
            assert!(engine.touched().contains("terms"));
            assert!(engine.touched().contains("username"));
        }

        #[test]
        fn test_next_clamps_on_last_step() {
            let mut engine = wizard_engine();
            engine.change("name", "Ann");
            engine.next();
            engine.change("username", "ann");
            engine.change("terms", true);
            assert_eq!(engine.next(), StepOutcome::Moved(2));
            assert_eq!(engine.next(), StepOutcome::Unchanged);
            assert_eq!(engine.current_step(), 2);
            assert!(engine.is_last_step());
        }

        #[test]
        fn test_previous_always_succeeds_and_keeps_errors() {
            let mut engine = wizard_engine();
            engine.change("name", "Ann");
            engine.next();
            engine.next();
            let errors_before = engine.errors().clone();
            assert!(!errors_before.is_empty());

            assert_eq!(engine.previous(), StepOutcome::Moved(0));
            assert_eq!(engine.errors(), &errors_before);
            assert_eq!(engine.previous(), StepOutcome::Unchanged);
            assert_eq!(engine.current_step(), 0);
        }

        #[test]
        fn test_flat_form_ignores_navigation() {
            let mut engine = flat_engine(vec![FieldSpec::text("a", "A").required()]);
            assert_eq!(engine.next(), StepOutcome::Unchanged);
            assert_eq!(engine.previous(), StepOutcome::Unchanged);
            assert!(engine.errors().is_empty());
            assert_eq!(engine.total_steps(), 1);
        }

        #[test]
        fn test_step_change_callback_fires_after_move() {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = seen.clone();
            let mut engine = FormEngine::new(
                wizard_schema(),
                FormOptions::default(),
                FormCallbacks::new(noop_handler()).on_step_change(move |step, total, values| {
                    let name = values.get("name").cloned().unwrap_or_default();
                    sink.lock().unwrap().push((step, total, name));
                }),
            );

            engine.next();
            assert!(seen.lock().unwrap().is_empty());

            engine.change("name", "Ann");
            engine.next();
            engine.previous();
            engine.previous();
            assert_eq!(
                *seen.lock().unwrap(),
                vec![(1, 3, FieldValue::from("Ann")), (0, 3, FieldValue::from("Ann"))]
            );
        }
    }

    mod reset {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reset_restores_defaults_not_initial_values() {
            let reset_calls = Arc::new(AtomicUsize::new(0));
            let counter = reset_calls.clone();
            let mut options = FormOptions::default();
            options
                .initial_values
                .insert("name".to_string(), FieldValue::from("Initial"));
            let mut engine = FormEngine::new(
                wizard_schema(),
                options,
                FormCallbacks::new(noop_handler()).on_reset(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
            assert_eq!(engine.value("name"), Some(&FieldValue::from("Initial")));

            engine.next();
            engine.change("newsletter", false);
            engine.blur("username");
            engine.reset();

            assert!(engine.errors().is_empty());
            assert!(engine.touched().is_empty());
            assert_eq!(engine.current_step(), 0);
            assert_eq!(engine.value("name"), Some(&FieldValue::from("")));
            assert_eq!(engine.value("newsletter"), Some(&FieldValue::Bool(true)));
            assert_eq!(
                engine.state(),
                &FormState::initialize(&wizard_schema(), &FormValues::new())
            );
            assert_eq!(reset_calls.load(Ordering::SeqCst), 1);
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_submit_on_early_step_acts_as_next() {
            let mut mock = MockSubmitHandler::new();
            mock.expect_submit().never();
            let mut engine = FormEngine::new(
                wizard_schema(),
                FormOptions::default(),
                FormCallbacks::new(Arc::new(mock)),
            );

            assert!(matches!(engine.submit(), SubmitOutcome::Blocked));
            assert_eq!(engine.current_step(), 0);
            assert_eq!(
                engine.errors().get("name").map(String::as_str),
                Some("Name is required")
            );

            engine.change("name", "Ann");
            assert!(matches!(engine.submit(), SubmitOutcome::Advanced(1)));
        }

        #[test]
        fn test_invalid_flat_form_never_calls_handler() {
            let mut mock = MockSubmitHandler::new();
            mock.expect_submit().never();
            let mut engine = FormEngine::new(
                FormSchema::Flat(vec![
                    FieldSpec::text("a", "A").required(),
                    FieldSpec::text("b", "B"),
                ]),
                FormOptions::default(),
                FormCallbacks::new(Arc::new(mock)),
            );

            assert!(matches!(engine.submit(), SubmitOutcome::Blocked));
            assert!(engine.touched().contains("a"));
            assert!(engine.touched().contains("b"));
        }

        #[tokio::test]
        async fn test_valid_flat_form_sends_all_values() {
            let mut mock = MockSubmitHandler::new();
            mock.expect_submit()
                .withf(|values| {
                    values.get("email") == Some(&FieldValue::from("a@b.com"))
                        && values.get("agree") == Some(&FieldValue::Bool(true))
                })
                .times(1)
                .returning(|_| Ok(()));
            let mut engine = FormEngine::new(
                FormSchema::Flat(vec![
                    FieldSpec::email("email", "Email").required(),
                    FieldSpec::checkbox("agree", "Agree").required(),
                ]),
                FormOptions::default(),
                FormCallbacks::new(Arc::new(mock)),
            );
            engine.change("email", "a@b.com");
            engine.change("agree", true);

            let SubmitOutcome::Dispatched(handle) = engine.submit() else {
                panic!("expected dispatch");
            };
            handle.await.unwrap();
        }

        #[test]
        fn test_submit_without_runtime_does_not_panic() {
            let mut mock = MockSubmitHandler::new();
            mock.expect_submit().never();
            let mut engine = FormEngine::new(
                FormSchema::Flat(vec![FieldSpec::text("a", "A").required()]),
                FormOptions::default(),
                FormCallbacks::new(Arc::new(mock)),
            );
            engine.change("a", "value");

            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| engine.submit()));
            assert!(matches!(outcome, Ok(SubmitOutcome::Unavailable)));
            assert!(engine.errors().is_empty());
            assert_eq!(engine.value("a"), Some(&FieldValue::from("value")));
        }

        #[tokio::test]
        async fn test_handler_failure_leaves_errors_empty() {
            let mut mock = MockSubmitHandler::new();
            mock.expect_submit()
                .times(2)
                .returning(|_| Err(anyhow::anyhow!("rejected")));
            let mut engine = FormEngine::new(
                FormSchema::Flat(vec![FieldSpec::text("a", "A")]),
                FormOptions::default(),
                FormCallbacks::new(Arc::new(mock)),
            );

            for _ in 0..2 {
                let SubmitOutcome::Dispatched(handle) = engine.submit() else {
                    panic!("expected dispatch");
                };
                assert!(handle.await.is_ok());
                assert!(engine.errors().is_empty());
            }
        }

        #[tokio::test]
        async fn test_last_step_validates_only_its_fields() {
            let mut mock = MockSubmitHandler::new();
            mock.expect_submit().times(1).returning(|_| Ok(()));
            let mut engine = FormEngine::new(
                wizard_schema(),
                FormOptions::default(),
                FormCallbacks::new(Arc::new(mock)),
            );
            engine.change("name", "Ann");
            engine.next();
            engine.change("username", "ann");
            engine.change("terms", true);
            engine.next();
            // A field from an earlier step goes invalid without blocking submit
            engine.change("name", "");

            let SubmitOutcome::Dispatched(handle) = engine.submit() else {
                panic!("expected dispatch");
            };
            handle.await.unwrap();
        }
    }

    #[test]
    fn test_set_loading_is_pass_through() {
        let mut engine = flat_engine(vec![FieldSpec::text("a", "A")]);
        assert!(!engine.options().loading);
        engine.set_loading(true);
        assert!(engine.options().loading);
        assert!(engine.errors().is_empty());
    }
}
