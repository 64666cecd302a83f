//! Application state and core logic

use crate::config::AppConfig;
use crate::demos::{build_engine, DemoEvent, DemoKind};
use crate::state::{
    AppState, FieldKind, FieldSpec, FieldValue, FocusRing, FocusTarget, FormButton, FormEngine,
    StepOutcome, SubmissionRecord, SubmitOutcome,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Main application struct
pub struct App {
    /// User configuration
    pub config: AppConfig,
    /// Front-end state around the engine
    pub state: AppState,
    /// Engine for the mounted demo
    pub engine: FormEngine,
    events_tx: UnboundedSender<DemoEvent>,
    events_rx: UnboundedReceiver<DemoEvent>,
    /// Submission task still running, if any
    pending: Option<JoinHandle<()>>,
    /// Set when a dispatch has not yet reported back
    awaiting_result: bool,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance, mounting the configured start demo
    pub fn new(config: AppConfig) -> Result<Self> {
        let (events_tx, events_rx) = unbounded_channel();
        let mut state = AppState::default();

        let requested = match config.start_demo.as_deref() {
            Some(name) => DemoKind::parse(name).unwrap_or_else(|| {
                state.push_error(format!("Unknown demo `{name}`, showing the contact form"));
                DemoKind::Contact
            }),
            None => DemoKind::Contact,
        };

        let (demo, engine) = match build_engine(requested, &config, events_tx.clone()) {
            Ok(engine) => (requested, engine),
            Err(err) => {
                state.push_error(format!("{err:#}"));
                (
                    DemoKind::Contact,
                    build_engine(DemoKind::Contact, &config, events_tx.clone())?,
                )
            }
        };
        state.current_demo = demo;
        tracing::info!(form_id = %engine.id(), demo = demo.title(), "form mounted");

        Ok(Self {
            config,
            state,
            engine,
            events_tx,
            events_rx,
            pending: None,
            awaiting_result: false,
            quit: false,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    fn has_custom(&self) -> bool {
        self.config.schema_path.is_some()
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.engine.set_loading(loading);
    }

    /// Replace the mounted engine with the given demo
    pub fn switch_demo(&mut self, demo: DemoKind) {
        match build_engine(demo, &self.config, self.events_tx.clone()) {
            Ok(engine) => {
                tracing::info!(form_id = %engine.id(), demo = demo.title(), "form mounted");
                self.engine = engine;
                self.state.current_demo = demo;
                self.state.focus.reset();
                self.state.status_message = None;
            }
            Err(err) => self.push_error(format!("{err:#}")),
        }
    }

    /// Drain demo events and notice finished submissions
    pub fn poll(&mut self) {
        // Sample completion before draining so a result sent just before
        // the task finished is always seen
        let finished = self.pending.as_ref().is_some_and(JoinHandle::is_finished);
        self.drain_events();

        if finished {
            self.pending = None;
            self.set_loading(false);
            if self.awaiting_result {
                self.awaiting_result = false;
                self.state.status_message =
                    Some("Submission did not complete, see the log for details".to_string());
            }
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                DemoEvent::Submitted { demo, values } => {
                    tracing::info!(demo = demo.title(), fields = values.len(), "submission received");
                    self.awaiting_result = false;
                    self.state
                        .record_submission(SubmissionRecord::new(demo, values));
                }
                DemoEvent::StepChanged { step, total } => {
                    self.state.status_message = Some(format!("Step {} of {total}", step + 1));
                }
                DemoEvent::Reset { demo } => {
                    self.state.status_message = Some(format!("{} reset", demo.title()));
                }
            }
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Submission dialog (modal)
        if self.state.show_submission {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.show_submission = false;
            }
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Char('c') if ctrl => {
                self.quit = true;
                return Ok(());
            }
            _ => {}
        }

        // Inputs are disabled while a submission is in flight
        if self.is_loading() {
            return Ok(());
        }

        match key.code {
            KeyCode::F(2) => self.switch_demo(self.state.current_demo.next(self.has_custom())),
            KeyCode::Char('r') if ctrl => self.press(FormButton::Reset),
            KeyCode::Tab => {
                self.blur_focused();
                let count = FocusRing::slot_count(&self.engine);
                self.state.focus.next(count);
            }
            KeyCode::BackTab => {
                self.blur_focused();
                let count = FocusRing::slot_count(&self.engine);
                self.state.focus.prev(count);
            }
            _ => match self.state.focus.target(&self.engine) {
                FocusTarget::Field(idx) => self.handle_field_key(idx, key),
                FocusTarget::Button(button) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.press(button);
                    }
                }
            },
        }
        Ok(())
    }

    fn handle_field_key(&mut self, idx: usize, key: KeyEvent) {
        let Some(kind) = self.engine.current_fields().get(idx).map(|f| f.kind) else {
            return;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match (kind, key.code) {
            (FieldKind::Checkbox, KeyCode::Char(' ') | KeyCode::Enter) => {
                self.edit_field(idx, |_, value| value.toggle());
            }
            (FieldKind::Select, KeyCode::Right | KeyCode::Char(' ')) => {
                self.edit_field(idx, |field, value| cycle_option(field, value, true));
            }
            (FieldKind::Select, KeyCode::Left) => {
                self.edit_field(idx, |field, value| cycle_option(field, value, false));
            }
            (FieldKind::Textarea, KeyCode::Enter) => {
                self.edit_field(idx, |_, value| value.push_char('\n'));
            }
            (_, KeyCode::Enter) => {
                self.blur_focused();
                self.press_primary();
            }
            (FieldKind::Checkbox | FieldKind::Select, _) => {}
            (_, KeyCode::Char(c)) => self.edit_field(idx, |_, value| value.push_char(c)),
            (_, KeyCode::Backspace) => self.edit_field(idx, |_, value| value.pop_char()),
            _ => {}
        }
    }

    /// Apply an edit to the current value of a visible field
    fn edit_field(&mut self, idx: usize, edit: impl FnOnce(&FieldSpec, &mut FieldValue)) {
        let Some(field) = self.engine.current_fields().get(idx) else {
            return;
        };
        let name = field.name.clone();
        let mut value = self
            .engine
            .value(&name)
            .cloned()
            .unwrap_or_else(|| field.default_or_empty());
        edit(field, &mut value);
        self.engine.change(&name, value);
    }

    fn blur_focused(&mut self) {
        if let FocusTarget::Field(idx) = self.state.focus.target(&self.engine) {
            if let Some(name) = self.engine.current_fields().get(idx).map(|f| f.name.clone()) {
                self.engine.blur(&name);
            }
        }
    }

    /// Enter on a field acts like the step's forward button
    fn press_primary(&mut self) {
        if self.engine.is_last_step() {
            self.press(FormButton::Submit);
        } else {
            self.press(FormButton::Next);
        }
    }

    fn press(&mut self, button: FormButton) {
        match button {
            FormButton::Previous => {
                if let StepOutcome::Moved(_) = self.engine.previous() {
                    self.state.focus.reset();
                }
            }
            FormButton::Reset => {
                self.engine.reset();
                self.state.focus.reset();
            }
            FormButton::Next => {
                let outcome = self.engine.next();
                self.after_step(outcome);
            }
            FormButton::Submit => match self.engine.submit() {
                SubmitOutcome::Advanced(step) => self.after_step(StepOutcome::Moved(step)),
                SubmitOutcome::Blocked => self.after_step(StepOutcome::Blocked),
                SubmitOutcome::Dispatched(handle) => {
                    self.pending = Some(handle);
                    self.awaiting_result = true;
                    self.set_loading(true);
                    self.state.status_message = Some("Submitting…".to_string());
                }
                SubmitOutcome::Unavailable => {
                    self.push_error("Submission could not start: no async runtime is running");
                }
            },
        }
    }

    fn after_step(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Moved(_) => self.state.focus.reset(),
            StepOutcome::Blocked => {
                self.state.status_message = Some("Please fix the highlighted fields".to_string());
                if let Some(idx) = self.first_invalid_field() {
                    let count = FocusRing::slot_count(&self.engine);
                    self.state.focus.set(idx, count);
                }
            }
            StepOutcome::Unchanged => {}
        }
    }

    fn first_invalid_field(&self) -> Option<usize> {
        self.engine
            .current_fields()
            .iter()
            .position(|f| self.engine.errors().contains_key(&f.name))
    }
}

/// Step a select field to the neighbouring option, wrapping at both ends
fn cycle_option(field: &FieldSpec, value: &mut FieldValue, forward: bool) {
    let count = field.options.len();
    if count == 0 {
        return;
    }
    let current = field
        .options
        .iter()
        .position(|o| o.value == value.as_text());
    let next = match (current, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(i), true) => (i + 1) % count,
        (Some(i), false) => (i + count - 1) % count,
    };
    *value = FieldValue::from(field.options[next].value.as_str());
}
