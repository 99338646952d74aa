//! Core library surface for the DJ Remix Organizer TUI.
//!
//! The binary wires these pieces together; tests and external tooling can
//! reuse the same store, organizer, and backup helpers directly.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod media;
pub mod models;
pub mod state;
pub mod ui;

/// Persistence entry points used by `main.rs`.
pub use db::{ensure_schema, Store};

pub use config::Settings;
pub use error::OrganizerError;
pub use media::MediaRegistry;
pub use models::{Library, Link, Song};
pub use state::Organizer;

/// The interactive application entry point and state container.
pub use ui::{run_app, App, AppOptions};
