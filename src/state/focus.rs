//! Keyboard focus over the visible fields and navigation buttons

use super::forms::FormEngine;

/// Buttons in the navigation row, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormButton {
    Previous,
    Reset,
    Next,
    Submit,
}

impl FormButton {
    pub fn label<'a>(&self, engine: &'a FormEngine) -> &'a str {
        let options = engine.options();
        match self {
            FormButton::Previous => &options.previous_label,
            FormButton::Reset => &options.reset_label,
            FormButton::Next => &options.next_label,
            FormButton::Submit => &options.submit_label,
        }
    }
}

/// Navigation buttons for the engine's current step
pub fn buttons_for(engine: &FormEngine) -> Vec<FormButton> {
    let mut buttons = Vec::with_capacity(3);
    if engine.is_stepped() && !engine.is_first_step() {
        buttons.push(FormButton::Previous);
    }
    if engine.options().show_reset {
        buttons.push(FormButton::Reset);
    }
    if engine.is_last_step() {
        buttons.push(FormButton::Submit);
    } else {
        buttons.push(FormButton::Next);
    }
    buttons
}

/// What the focus ring currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(usize),
    Button(FormButton),
}

/// Wrapping focus index over `fields + buttons` slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusRing {
    index: usize,
}

impl FocusRing {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn next(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.index = (self.index + 1) % count;
    }

    pub fn prev(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if self.index == 0 || self.index >= count {
            self.index = count - 1;
        } else {
            self.index -= 1;
        }
    }

    pub fn set(&mut self, index: usize, count: usize) {
        self.index = index.min(count.saturating_sub(1));
    }

    /// Resolve the index against the engine's visible fields and buttons
    pub fn target(&self, engine: &FormEngine) -> FocusTarget {
        let field_count = engine.current_fields().len();
        if self.index < field_count {
            return FocusTarget::Field(self.index);
        }
        let buttons = buttons_for(engine);
        let button = buttons
            .get(self.index - field_count)
            .or(buttons.last())
            .copied()
            .unwrap_or(FormButton::Submit);
        FocusTarget::Button(button)
    }

    /// Number of focusable slots on the engine's current step
    pub fn slot_count(engine: &FormEngine) -> usize {
        engine.current_fields().len() + buttons_for(engine).len()
    }
}
