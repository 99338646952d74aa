use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;

use crate::config::StorageSettings;
use crate::models::{Library, Link, Song};

/// Synchronous key-value store holding the two serialized collections.
///
/// Each collection lives under its own fixed key as JSON text. There is no
/// schema version: whatever shape is stored is what gets parsed back.
pub struct Store {
    conn: Connection,
    songs_key: String,
    links_key: String,
}

impl Store {
    pub fn new(conn: Connection, settings: &StorageSettings) -> Self {
        Self {
            conn,
            songs_key: settings.songs_key.clone(),
            links_key: settings.links_key.clone(),
        }
    }

    /// Raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read key {key}"))
    }

    /// Overwrite the value stored under `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .with_context(|| format!("failed to write key {key}"))?;
        Ok(())
    }

    /// Hydrate both collections. A record that is missing or does not parse
    /// becomes an empty collection; only storage failures are errors.
    pub fn load(&self) -> Result<Library> {
        let songs: Vec<Song> = self.load_record(&self.songs_key)?;
        let links: Vec<Link> = self.load_record(&self.links_key)?;
        tracing::info!(songs = songs.len(), links = links.len(), "loaded library");
        Ok(Library { songs, links })
    }

    /// Serialize both collections and overwrite their records in one
    /// transaction.
    pub fn save(&self, songs: &[Song], links: &[Link]) -> Result<()> {
        let songs_json = serde_json::to_string(songs).context("failed to serialize songs")?;
        let links_json = serde_json::to_string(links).context("failed to serialize links")?;

        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to begin save transaction")?;
        self.set(&self.songs_key, &songs_json)?;
        self.set(&self.links_key, &links_json)?;
        tx.commit().context("failed to commit save transaction")?;

        tracing::debug!(songs = songs.len(), links = links.len(), "persisted library");
        Ok(())
    }

    fn load_record<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored record is unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }
}
