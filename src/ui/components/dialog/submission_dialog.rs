//! Dialog showing the values a form handed to its submit handler

use super::base::{key_hint, render_dialog, DialogConfig};
use crate::state::SubmissionRecord;
use ratatui::{style::Color, Frame};

/// Render the latest submission as pretty-printed JSON
pub fn render_submission_dialog(frame: &mut Frame, record: &SubmissionRecord) {
    let title = format!(
        "{} submitted at {}",
        record.demo.title(),
        record.received_at.format("%H:%M:%S")
    );
    let message = record.to_json();
    render_dialog(
        frame,
        DialogConfig {
            title: &title,
            title_color: Color::Green,
            border_color: Color::Green,
            message: &message,
            hint: Some(key_hint(&["Enter"], "to close")),
            max_width: 70,
        },
    );
}
