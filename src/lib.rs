//! Formflow TUI - schema-driven forms and wizards in the terminal
//!
//! The form engine lives in [`state`]; [`ui`] renders it with ratatui and
//! [`app`] maps key presses onto engine transitions.

pub mod app;
pub mod config;
pub mod demos;
pub mod state;
pub mod ui;
