//! Session-scoped registry of playable media handles.
//!
//! A handle is acquired when a song is created with an attached file and is
//! released when the song is deleted or the registry is dropped. Its URL
//! embeds a per-process session id, so URLs persisted by an earlier run never
//! resolve again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::error::OrganizerError;
use crate::models::{MediaKind, Song};

/// URL scheme of session media references.
const SESSION_SCHEME: &str = "session";

/// A playable resource valid for the lifetime of the owning registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    pub url: String,
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaHandle {
    /// File name shown in the UI.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

pub struct MediaRegistry {
    session: Uuid,
    handles: HashMap<String, MediaHandle>,
    video_extensions: Vec<String>,
}

impl MediaRegistry {
    pub fn new(video_extensions: Vec<String>) -> Self {
        let session = Uuid::new_v4();
        tracing::debug!(%session, "media session started");
        Self {
            session,
            handles: HashMap::new(),
            video_extensions: video_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    /// Media kind declared by the file's extension: video when listed in the
    /// configured video extensions, audio otherwise.
    pub fn declared_kind(&self, path: &Path) -> MediaKind {
        let is_video = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.video_extensions.iter().any(|known| *known == ext)
            })
            .unwrap_or(false);

        if is_video {
            MediaKind::Video
        } else {
            MediaKind::Audio
        }
    }

    /// Derive a handle for `song_id` from the raw file at `path`. Any handle
    /// previously held for the same song is replaced.
    pub fn acquire(&mut self, song_id: &str, path: &Path) -> Result<MediaHandle, OrganizerError> {
        if !path.is_file() {
            return Err(OrganizerError::MissingMedia(path.to_path_buf()));
        }

        let handle = MediaHandle {
            url: format!("{SESSION_SCHEME}://{}/{song_id}", self.session),
            path: path.to_path_buf(),
            kind: self.declared_kind(path),
        };
        tracing::debug!(song_id, url = %handle.url, kind = %handle.kind, "acquired media handle");
        self.handles.insert(song_id.to_string(), handle.clone());
        Ok(handle)
    }

    /// Handle for `song`, provided its stored URL was issued by this session.
    pub fn resolve(&self, song: &Song) -> Option<&MediaHandle> {
        let url = song.media_url.as_deref()?;
        self.handles
            .get(&song.id)
            .filter(|handle| handle.url == url)
    }

    /// Drop the handle owned by `song_id`.
    pub fn release(&mut self, song_id: &str) -> Option<MediaHandle> {
        let released = self.handles.remove(song_id);
        if released.is_some() {
            tracing::debug!(song_id, "released media handle");
        }
        released
    }

    /// Keep only handles still referenced by `songs` with the same URL.
    pub fn retain_referenced(&mut self, songs: &[Song]) {
        let before = self.handles.len();
        self.handles.retain(|song_id, handle| {
            songs.iter().any(|song| {
                song.id == *song_id && song.media_url.as_deref() == Some(handle.url.as_str())
            })
        });
        let dropped = before - self.handles.len();
        if dropped > 0 {
            tracing::debug!(dropped, "released unreferenced media handles");
        }
    }

    /// Release every handle. Returns how many were held.
    pub fn clear(&mut self) -> usize {
        let count = self.handles.len();
        self.handles.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Hand the song's media to the system player.
    pub fn play(&self, song: &Song) -> Result<&MediaHandle> {
        let handle = self.resolve(song).ok_or(OrganizerError::MediaUnavailable)?;
        open::that(&handle.path)
            .with_context(|| format!("failed to open {}", handle.path.display()))?;
        tracing::info!(song_id = %song.id, path = %handle.path.display(), "playing media");
        Ok(handle)
    }
}

impl Drop for MediaRegistry {
    fn drop(&mut self) {
        let released = self.clear();
        tracing::debug!(session = %self.session, released, "media session ended");
    }
}

#[cfg(test)]
mod tests;
