//! Owned domain state and the operations that mutate it.
//!
//! `Organizer` holds both collections together with the store they are
//! flushed to and the session media registry. Every mutation persists
//! immediately and queues a [`Change`] so views can refresh what they show
//! without the state layer knowing about rendering.

use std::fmt::Write as _;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, Utc};

use crate::db::{read_backup, write_backup, Store};
use crate::error::OrganizerError;
use crate::media::MediaRegistry;
use crate::models::{Library, Link, NewSong, Song, BPM_PLACEHOLDER, KEY_PLACEHOLDER};

/// Fallback when the configured date format cannot be rendered.
const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// State-change notification drained by the UI after each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    SongAdded(String),
    SongDeleted(String),
    LinkAdded(i64),
    /// Both collections were replaced wholesale by an import.
    Replaced,
}

impl Change {
    /// Whether views derived from the song list need rebuilding.
    pub fn touches_songs(&self) -> bool {
        !matches!(self, Change::LinkAdded(_))
    }
}

/// Songs whose title or artist contains `query` case-insensitively, or whose
/// bpm contains it verbatim. An empty query keeps everything. Insertion order
/// is preserved.
pub fn filter_songs<'a>(songs: &'a [Song], query: &str) -> Vec<&'a Song> {
    if query.is_empty() {
        return songs.iter().collect();
    }

    let needle = query.to_lowercase();
    songs
        .iter()
        .filter(|song| {
            song.title.to_lowercase().contains(&needle)
                || song.artist.to_lowercase().contains(&needle)
                || song.bpm.contains(query)
        })
        .collect()
}

pub struct Organizer {
    library: Library,
    store: Store,
    media: MediaRegistry,
    changes: Vec<Change>,
    last_id: i64,
    date_format: String,
}

impl Organizer {
    /// Hydrate the domain state from `store`.
    pub fn open(store: Store, media: MediaRegistry, date_format: &str) -> Result<Self> {
        let library = store.load()?;
        let last_id = highest_id(&library);
        Ok(Self {
            library,
            store,
            media,
            changes: Vec::new(),
            last_id,
            date_format: date_format.to_string(),
        })
    }

    pub fn songs(&self) -> &[Song] {
        &self.library.songs
    }

    pub fn links(&self) -> &[Link] {
        &self.library.links
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn media(&self) -> &MediaRegistry {
        &self.media
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.library.songs.iter().find(|song| song.id == id)
    }

    /// Pending notifications, oldest first.
    pub fn take_changes(&mut self) -> Vec<Change> {
        mem::take(&mut self.changes)
    }

    /// Append a song built from raw form values. Blank bpm/key become
    /// placeholders; an attached file yields a session media handle.
    pub fn add_song(&mut self, input: NewSong) -> Result<Song> {
        let id = self.next_id().to_string();
        let (media_url, file_type) = match &input.media {
            Some(path) => {
                let handle = self.media.acquire(&id, path)?;
                (Some(handle.url), Some(handle.kind))
            }
            None => (None, None),
        };

        let song = Song {
            id,
            title: input.title,
            artist: input.artist,
            bpm: or_placeholder(input.bpm, BPM_PLACEHOLDER),
            key: or_placeholder(input.key, KEY_PLACEHOLDER),
            media_url,
            file_type,
            date_added: self.today(),
        };

        self.library.songs.push(song.clone());
        self.persist()?;
        tracing::info!(id = %song.id, title = %song.title, "song added");
        self.changes.push(Change::SongAdded(song.id.clone()));
        Ok(song)
    }

    /// Remove every song with `id` and release their media. Imported data may
    /// carry duplicate ids; the first match is returned. Links pointing at
    /// the id are left untouched.
    pub fn delete_song(&mut self, id: &str) -> Result<Song> {
        let song = self
            .library
            .songs
            .iter()
            .find(|song| song.id == id)
            .cloned()
            .ok_or(OrganizerError::SongNotFound)?;

        self.library.songs.retain(|song| song.id != id);
        self.media.release(&song.id);
        self.persist()?;
        tracing::info!(id = %song.id, title = %song.title, "song deleted");
        self.changes.push(Change::SongDeleted(song.id.clone()));
        Ok(song)
    }

    /// Record a remix relationship. Source and target must differ; nothing
    /// else is checked.
    pub fn add_link(&mut self, source: &str, target: &str, notes: &str) -> Result<Link> {
        if source == target {
            tracing::debug!(source, "rejected self link");
            return Err(OrganizerError::SelfLink.into());
        }

        let link = Link {
            id: self.next_id(),
            source: source.to_string(),
            target: target.to_string(),
            notes: notes.to_string(),
        };

        self.library.links.push(link.clone());
        self.persist()?;
        tracing::info!(id = link.id, source, target, "link added");
        self.changes.push(Change::LinkAdded(link.id));
        Ok(link)
    }

    /// Write the whole library as a pretty-printed backup at `path`.
    pub fn export_to(&self, path: &Path) -> Result<PathBuf> {
        write_backup(path, &self.library)?;
        tracing::info!(
            path = %path.display(),
            songs = self.library.songs.len(),
            links = self.library.links.len(),
            "exported backup"
        );
        Ok(path.to_path_buf())
    }

    /// Replace the library with the backup at `path`. A malformed file leaves
    /// everything as it was.
    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        let library = match read_backup(path) {
            Ok(library) => library,
            Err(err) => {
                if let OrganizerError::MalformedBackup { reason } = &err {
                    tracing::warn!(path = %path.display(), %reason, "rejected backup");
                }
                return Err(err.into());
            }
        };

        self.replace_library(library)?;
        tracing::info!(
            path = %path.display(),
            songs = self.library.songs.len(),
            links = self.library.links.len(),
            "imported backup"
        );
        Ok(())
    }

    /// Swap in a new library wholesale and persist it.
    pub fn replace_library(&mut self, library: Library) -> Result<()> {
        self.media.retain_referenced(&library.songs);
        self.last_id = self.last_id.max(highest_id(&library));
        self.library = library;
        self.persist()?;
        self.changes.push(Change::Replaced);
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.library.songs, &self.library.links)
    }

    /// Millisecond timestamp, bumped past the last issued id so ids stay
    /// unique within a session. Saturates at `i64::MAX`.
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    fn today(&self) -> String {
        let now = Local::now();
        let mut formatted = String::new();
        if write!(formatted, "{}", now.format(&self.date_format)).is_err() {
            formatted = now.format(DEFAULT_DATE_FORMAT).to_string();
        }
        formatted
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// Largest numeric id present in either collection.
fn highest_id(library: &Library) -> i64 {
    let song_ids = library
        .songs
        .iter()
        .filter_map(|song| song.id.parse::<i64>().ok());
    let link_ids = library.links.iter().map(|link| link.id);
    song_ids.chain(link_ids).max().unwrap_or(0)
}
