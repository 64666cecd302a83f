//! Layout components (header, status bar)

use crate::app::App;
use crate::demos::DemoKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the demo tabs
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut demos = vec![DemoKind::Contact, DemoKind::SignUp];
    if app.config.schema_path.is_some() {
        demos.push(DemoKind::Custom);
    }

    let mut spans = vec![Span::styled(
        " formflow ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for demo in demos {
        spans.push(Span::raw(" "));
        let style = if demo == app.state.current_demo {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", demo.title()), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Submission indicator
    let indicator = if app.is_loading() {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    };
    spans.push(indicator);

    let invalid = app.engine.errors().len();
    if invalid > 0 {
        spans.push(Span::styled(
            format!("{invalid} invalid"),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::White)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Submission count on the right
    let count = format!(" {} submitted ", app.state.submissions.len());
    let width = count.chars().count() as u16;
    let count_area = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y,
        width: width.min(area.width),
        height: 1,
    };
    let count_widget =
        Paragraph::new(count).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(count_widget, count_area);
}
