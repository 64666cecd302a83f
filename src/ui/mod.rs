//! UI module for rendering the TUI

pub mod components;
pub mod forms;
mod layout;
#[cfg(test)]
pub(crate) mod test_support;

use crate::app::App;
use components::{render_error_dialog, render_submission_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);
    forms::draw_form(
        frame,
        main_area,
        &app.engine,
        &app.state.focus,
        app.state.current_demo.title(),
    );
    layout::draw_status_bar(frame, status_area, app);

    // Overlays, errors on top
    if app.state.show_submission {
        if let Some(record) = app.state.latest_submission() {
            render_submission_dialog(frame, record);
        }
    }
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}
