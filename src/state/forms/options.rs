//! Caller-supplied configuration for a form instance

use std::sync::Arc;

use super::submission::SubmitHandler;
use super::FormValues;

/// Called after `reset` has cleared the form
pub type ResetCallback = Box<dyn FnMut() + Send>;

/// Called with `(step, total_steps, values)` after the step index changes
pub type StepChangeCallback = Box<dyn FnMut(usize, usize, &FormValues) + Send>;

/// Display options and caller-owned flags.
///
/// Labels carry no engine semantics. `loading` is owned by the caller and
/// only passed through to the render layer.
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Applied once at mount, overriding field defaults
    pub initial_values: FormValues,
    pub loading: bool,
    pub submit_label: String,
    pub reset_label: String,
    pub next_label: String,
    pub previous_label: String,
    pub show_reset: bool,
    pub show_step_indicator: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            initial_values: FormValues::new(),
            loading: false,
            submit_label: "Submit".to_string(),
            reset_label: "Reset".to_string(),
            next_label: "Next".to_string(),
            previous_label: "Previous".to_string(),
            show_reset: false,
            show_step_indicator: false,
        }
    }
}

/// Collaborators invoked by the engine
pub struct FormCallbacks {
    pub on_submit: Arc<dyn SubmitHandler>,
    pub on_reset: Option<ResetCallback>,
    pub on_step_change: Option<StepChangeCallback>,
}

impl FormCallbacks {
    pub fn new(on_submit: Arc<dyn SubmitHandler>) -> Self {
        Self {
            on_submit,
            on_reset: None,
            on_step_change: None,
        }
    }

    pub fn on_reset(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_reset = Some(Box::new(callback));
        self
    }

    pub fn on_step_change(
        mut self,
        callback: impl FnMut(usize, usize, &FormValues) + Send + 'static,
    ) -> Self {
        self.on_step_change = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for FormCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormCallbacks")
            .field("on_reset", &self.on_reset.is_some())
            .field("on_step_change", &self.on_step_change.is_some())
            .finish_non_exhaustive()
    }
}
