//! Domain models shared by the store, the backup files and the TUI. They double
//! as the JSON shape written to the key-value store, so the field names follow
//! the persisted camelCase layout rather than Rust naming.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder stored when a song is created without a tempo.
pub const BPM_PLACEHOLDER: &str = "?";
/// Placeholder stored when a song is created without a musical key.
pub const KEY_PLACEHOLDER: &str = "-";

/// Kind of media attached to a song. Derived once from the declared type of
/// the attached file and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A catalog entry. Songs are created once and never edited in place; the only
/// other lifecycle event is deletion.
pub struct Song {
    /// Millisecond timestamp rendered as text. Links refer to songs through it.
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist: String,
    /// Tempo as typed, or [`BPM_PLACEHOLDER`]. Older backups may carry a
    /// number here, which is read back as its decimal text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub bpm: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub key: String,
    /// Session-scoped media reference. It is persisted, but only the session
    /// that issued it can resolve it.
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub media_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_kind")]
    pub file_type: Option<MediaKind>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_added: String,
}

impl Song {
    /// Label used by the remix selectors: `Artist - Title (126 BPM)`.
    pub fn selector_label(&self) -> String {
        format!("{} - {} ({} BPM)", self.artist, self.title, self.bpm)
    }

    /// `Title - Artist`, omitting the hyphen when the artist is blank.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Directed remix relationship between two songs. `source` and `target` are
/// soft references: nothing keeps them pointing at existing songs.
pub struct Link {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub target: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
}

/// The whole domain state: both collections in insertion order. This is also
/// the exact layout of a backup file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Library {
    pub songs: Vec<Song>,
    pub links: Vec<Link>,
}

/// Raw values collected by the song form.
#[derive(Debug, Clone, Default)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub bpm: String,
    pub key: String,
    pub media: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    /// Objects and arrays where a scalar belongs.
    Other(serde_json::Value),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseScalar::Text(text)) => text,
        Some(LooseScalar::Number(number)) => number.to_string(),
        Some(LooseScalar::Flag(flag)) => flag.to_string(),
        Some(LooseScalar::Other(_)) | None => String::new(),
    })
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseScalar::Text(text)) => Some(text),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseScalar::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or_default(),
        Some(LooseScalar::Text(text)) => text.trim().parse().unwrap_or_default(),
        Some(LooseScalar::Flag(_)) | Some(LooseScalar::Other(_)) | None => 0,
    })
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<MediaKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseScalar::Text(text)) if text.eq_ignore_ascii_case("video") => {
            Some(MediaKind::Video)
        }
        Some(LooseScalar::Text(text)) if text.eq_ignore_ascii_case("audio") => {
            Some(MediaKind::Audio)
        }
        _ => None,
    })
}
