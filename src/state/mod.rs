//! Application state module

mod app_state;
mod focus;
mod forms;

pub use app_state::*;
pub use focus::*;
pub use forms::*;
