//! Configuration loader and schema types.
//!
//! Settings cover where the key-value store lives, the names of its two
//! records, where backups are written, and a handful of UI and logging knobs.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
