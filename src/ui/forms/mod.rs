//! Form rendering module
//!
//! This module contains UI components for rendering forms:
//! - `field_renderer`: one bordered box per field
//! - `step_indicator`: the stepper above wizards
//! - `form_view`: the whole form with its navigation row

mod field_renderer;
mod form_view;
mod step_indicator;

pub use field_renderer::{draw_field, field_height, FieldView};
pub use form_view::draw_form;
pub use step_indicator::{draw_step_indicator, step_indicator_line};
