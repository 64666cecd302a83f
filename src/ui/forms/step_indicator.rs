//! Horizontal stepper shown above multi-step forms

use crate::state::FormEngine;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Build the stepper line: completed steps get a check mark
pub fn step_indicator_line(engine: &FormEngine) -> Line<'static> {
    let current = engine.current_step();
    let mut spans = Vec::new();

    for idx in 0..engine.total_steps() {
        let Some(step) = engine.schema().step(idx) else {
            continue;
        };
        let (marker, style) = if idx < current {
            ("✓".to_string(), Style::default().fg(Color::Green))
        } else if idx == current {
            (
                (idx + 1).to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ((idx + 1).to_string(), Style::default().fg(Color::DarkGray))
        };
        if idx > 0 {
            spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("({marker}) {}", step.title), style));
    }

    Line::from(spans)
}

/// Draw the stepper for stepped forms
pub fn draw_step_indicator(frame: &mut Frame, area: Rect, engine: &FormEngine) {
    frame.render_widget(Paragraph::new(step_indicator_line(engine)), area);
}
