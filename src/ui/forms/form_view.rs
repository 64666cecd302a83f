//! Whole-form rendering: stepper, step header, fields and navigation row

use super::field_renderer::{draw_field, field_height, FieldView};
use super::step_indicator::draw_step_indicator;
use crate::state::{buttons_for, FocusRing, FocusTarget, FormButton, FormEngine};
use crate::ui::components::{button_width, render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the form for the engine's current step
pub fn draw_form(frame: &mut Frame, area: Rect, engine: &FormEngine, focus: &FocusRing, title: &str) {
    let loading = engine.options().loading;
    let block_title = if loading {
        format!(" {title} (submitting…) ")
    } else {
        format!(" {title} ")
    };
    let block = Block::default()
        .title(block_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = engine.current_fields();
    let step = engine.current_step_spec();
    let show_indicator = engine.is_stepped() && engine.options().show_step_indicator;

    let mut constraints = Vec::with_capacity(fields.len() + 5);
    if show_indicator {
        constraints.push(Constraint::Length(2));
    }
    if step.is_some() {
        constraints.push(Constraint::Length(2));
    }
    constraints.extend(fields.iter().map(|f| Constraint::Length(field_height(f))));
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);
    let mut next_chunk = chunks.iter().copied();
    let mut take = || next_chunk.next().unwrap_or_default();

    if show_indicator {
        draw_step_indicator(frame, take(), engine);
    }

    if let Some(step) = step {
        let mut lines = vec![Line::from(Span::styled(
            step.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(description) = &step.description {
            lines.push(Line::from(Span::styled(
                description.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), take());
    }

    let target = focus.target(engine);
    for (idx, field) in fields.iter().enumerate() {
        let empty = field.default_or_empty();
        let value = engine.value(&field.name).unwrap_or(&empty);
        draw_field(
            frame,
            take(),
            FieldView {
                spec: field,
                value,
                error: engine.visible_error(&field.name),
                is_active: target == FocusTarget::Field(idx),
                disabled: loading,
            },
        );
    }

    draw_navigation(frame, take(), engine, target);
    draw_footer(frame, take(), engine);
}

/// Draw the Previous / Reset / Next-or-Submit row
fn draw_navigation(frame: &mut Frame, area: Rect, engine: &FormEngine, target: FocusTarget) {
    let loading = engine.options().loading;
    let buttons = buttons_for(engine);
    let labels: Vec<&str> = buttons
        .iter()
        .map(|b| {
            if loading && *b == FormButton::Submit {
                "…"
            } else {
                b.label(engine)
            }
        })
        .collect();

    let mut constraints: Vec<Constraint> = labels
        .iter()
        .map(|l| Constraint::Length(button_width(l)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .spacing(1)
        .split(area);

    for (idx, (button, label)) in buttons.iter().zip(labels).enumerate() {
        let is_selected = target == FocusTarget::Button(*button);
        render_button(frame, chunks[idx], label, is_selected, !loading);
    }
}

/// Draw the step counter and key hints
fn draw_footer(frame: &mut Frame, area: Rect, engine: &FormEngine) {
    let mut spans = Vec::new();
    if engine.is_stepped() {
        spans.push(Span::styled(
            format!(
                "Step {} of {}   ",
                engine.current_step() + 1,
                engine.total_steps()
            ),
            Style::default().fg(Color::White),
        ));
    }
    for (key, action) in [
        ("Tab", "next field"),
        ("Enter", "activate"),
        ("Ctrl+R", "reset"),
        ("F2", "switch form"),
        ("Esc", "quit"),
    ] {
        spans.push(Span::styled(key, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(": {action}  ")));
    }
    let footer = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{submit_fn, FieldSpec, FormCallbacks, FormOptions, FormSchema, StepSpec};
    use crate::ui::test_support::render_to_string;

    fn wizard(options: FormOptions) -> FormEngine {
        FormEngine::new(
            FormSchema::Stepped(vec![
                StepSpec::new("Personal Info", vec![FieldSpec::text("name", "Name").required()])
                    .with_description("Enter your personal details"),
                StepSpec::new("Account", vec![FieldSpec::text("user", "User")]),
            ]),
            options,
            FormCallbacks::new(submit_fn(|_| async { anyhow::Ok(()) })),
        )
    }

    fn render(engine: &FormEngine) -> String {
        render_to_string(80, 24, |frame| {
            let area = frame.area();
            draw_form(frame, area, engine, &FocusRing::default(), "Sign Up");
        })
    }

    #[test]
    fn test_first_step_layout() {
        let engine = wizard(FormOptions {
            show_step_indicator: true,
            ..FormOptions::default()
        });
        let screen = render(&engine);
        assert!(screen.contains("Sign Up"));
        assert!(screen.contains("(1) Personal Info"));
        assert!(screen.contains("Enter your personal details"));
        assert!(screen.contains("Name *"));
        assert!(screen.contains("Next"));
        assert!(!screen.contains("Previous"));
        assert!(screen.contains("Step 1 of 2"));
    }

    #[test]
    fn test_errors_render_after_failed_next() {
        let mut engine = wizard(FormOptions::default());
        assert!(!render(&engine).contains("Name is required"));
        engine.next();
        assert!(render(&engine).contains("Name is required"));
    }

    #[test]
    fn test_last_step_shows_previous_and_submit() {
        let mut engine = wizard(FormOptions::default());
        engine.change("name", "Ada");
        engine.next();
        let screen = render(&engine);
        assert!(screen.contains("Previous"));
        assert!(screen.contains("Submit"));
        assert!(screen.contains("Step 2 of 2"));
    }

    #[test]
    fn test_loading_marks_title() {
        let mut engine = wizard(FormOptions::default());
        engine.set_loading(true);
        assert!(render(&engine).contains("submitting"));
    }

    #[test]
    fn test_flat_form_has_no_step_counter() {
        let engine = FormEngine::new(
            FormSchema::Flat(vec![FieldSpec::text("a", "Alpha")]),
            FormOptions {
                show_reset: true,
                ..FormOptions::default()
            },
            FormCallbacks::new(submit_fn(|_| async { anyhow::Ok(()) })),
        );
        let screen = render(&engine);
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Reset"));
        assert!(screen.contains("Submit"));
        assert!(!screen.contains("Step 1"));
    }
}
