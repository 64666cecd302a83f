//! Field rendering utilities for forms

use crate::state::{FieldKind, FieldSpec, FieldValue};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows used by a single-line field (borders + content)
pub const FIELD_HEIGHT: u16 = 3;

/// Rows used by a multiline field
pub const MULTILINE_FIELD_HEIGHT: u16 = 6;

/// Height a field needs on screen
pub fn field_height(field: &FieldSpec) -> u16 {
    if field.kind.is_multiline() {
        MULTILINE_FIELD_HEIGHT
    } else {
        FIELD_HEIGHT
    }
}

/// Everything the renderer needs to know about one field
pub struct FieldView<'a> {
    pub spec: &'a FieldSpec,
    pub value: &'a FieldValue,
    /// Error to show, already filtered by touched state
    pub error: Option<&'a str>,
    pub is_active: bool,
    pub disabled: bool,
}

fn placeholder_text(spec: &FieldSpec) -> String {
    match (&spec.placeholder, spec.kind) {
        (Some(p), _) => p.clone(),
        (None, FieldKind::Select) => format!("Select {}", spec.label),
        (None, _) => "(empty)".to_string(),
    }
}

/// Draw a form field from its spec and current value
pub fn draw_field(frame: &mut Frame, area: Rect, view: FieldView) {
    let FieldView {
        spec,
        value,
        error,
        is_active,
        disabled,
    } = view;

    let accent = if error.is_some() {
        Color::Red
    } else if is_active && !disabled {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let border_style = Style::default().fg(accent);

    let display_value = spec.display_value(value);
    let is_placeholder = display_value.is_empty() && spec.kind != FieldKind::Checkbox;
    let text_style = if is_placeholder || disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let cursor = if is_active && !disabled {
        match spec.kind {
            FieldKind::Checkbox => "  (space to toggle)",
            FieldKind::Select => "  ◀ ▶",
            _ => "▌",
        }
    } else {
        ""
    };
    let cursor_span = Span::styled(cursor, Style::default().fg(Color::Cyan));

    let shown = if is_placeholder && !(is_active && spec.kind != FieldKind::Select) {
        placeholder_text(spec)
    } else {
        display_value
    };

    let content = if spec.kind.is_multiline() {
        let mut lines: Vec<Line> = shown
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), text_style)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans.push(cursor_span);
        } else {
            lines.push(Line::from(cursor_span));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![Span::styled(shown, text_style), cursor_span]))
    };

    let mut title = vec![Span::raw(format!(" {}", spec.label))];
    if spec.required {
        title.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    title.push(Span::raw(" "));

    let mut block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
