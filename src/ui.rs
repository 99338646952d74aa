//! Ratatui front-end. `app` owns the interaction state and rendering, the
//! remaining modules hold form state, screen state, and small layout helpers.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, AppOptions};
pub use terminal::run_app;
