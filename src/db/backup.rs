use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::OrganizerError;
use crate::models::{Library, Link, Song};

/// Pretty-printed JSON object `{"songs": [...], "links": [...]}`.
pub fn to_backup_json(library: &Library) -> Result<String> {
    serde_json::to_string_pretty(library).context("failed to serialize backup")
}

/// Write a backup file, replacing any previous one at `path`.
pub fn write_backup(path: &Path, library: &Library) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create export directory")?;
    }
    let json = to_backup_json(library)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Parse backup text. The only structural requirement is an object exposing
/// both a `songs` and a `links` field holding arrays of objects; missing
/// fields inside individual records fall back to empty values.
pub fn parse_backup(text: &str) -> Result<Library, OrganizerError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| OrganizerError::malformed(err.to_string()))?;

    let songs = present_field(&value, "songs")?;
    let links = present_field(&value, "links")?;

    let songs: Vec<Song> = serde_json::from_value(songs.clone())
        .map_err(|err| OrganizerError::malformed(format!("songs: {err}")))?;
    let links: Vec<Link> = serde_json::from_value(links.clone())
        .map_err(|err| OrganizerError::malformed(format!("links: {err}")))?;

    Ok(Library { songs, links })
}

/// Read and parse a backup file. An unreadable file is reported the same way
/// as a malformed one.
pub fn read_backup(path: &Path) -> Result<Library, OrganizerError> {
    let text = fs::read_to_string(path)
        .map_err(|err| OrganizerError::malformed(format!("{}: {err}", path.display())))?;
    parse_backup(&text)
}

fn present_field<'a>(value: &'a Value, name: &str) -> Result<&'a Value, OrganizerError> {
    match value.get(name) {
        Some(Value::Null) | None => Err(OrganizerError::malformed(format!(
            "missing `{name}` field"
        ))),
        Some(field) => Ok(field),
    }
}
