//! Persistence module split across logical submodules: the SQLite connection,
//! the two-record key-value store, and backup files.

mod backup;
mod connection;
mod store;

pub use backup::{parse_backup, read_backup, to_backup_json, write_backup};
pub use connection::{ensure_schema, open_in_memory};
pub use store::Store;

#[cfg(test)]
mod tests;
