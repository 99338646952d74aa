use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".dj-remix-organizer";
/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "organizer.sqlite";
/// Log file name stored inside the application data directory.
pub const LOG_FILE_NAME: &str = "organizer.log";

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/dj-remix-organizer/config.toml`
/// or `~/.config/dj-remix-organizer/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DJ_ORGANIZER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub backup: BackupSettings,
    pub ui: UiSettings,
    pub media: MediaSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Explicit SQLite file. Defaults to `~/.dj-remix-organizer/organizer.sqlite`.
    pub database_path: Option<PathBuf>,
    /// Key holding the serialized song list.
    pub songs_key: String,
    /// Key holding the serialized link list.
    pub links_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            songs_key: "dj_pro_songs".to_string(),
            links_key: "dj_pro_links".to_string(),
        }
    }
}

impl StorageSettings {
    /// Configured database file, or the default one inside the data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupSettings {
    /// Fixed name of the exported backup file.
    pub file_name: String,
    /// Directory exports are written to. Defaults to the user's download
    /// directory, then the current directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            file_name: "dj_organizer_backup.json".to_string(),
            export_dir: None,
        }
    }
}

impl BackupSettings {
    /// Full path the export action writes to.
    pub fn export_path(&self) -> PathBuf {
        let dir = self
            .export_dir
            .clone()
            .or_else(|| UserDirs::new().and_then(|dirs| dirs.download_dir().map(PathBuf::from)))
            .or_else(|| env::current_dir().ok())
            .unwrap_or_default();
        dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// How long a toast stays in the footer (seconds).
    pub toast_seconds: u64,
    /// `chrono` format used for a song's creation date.
    pub date_format: String,
    /// Whether the sidebar starts expanded.
    pub sidebar_visible: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            toast_seconds: 3,
            date_format: "%d/%m/%Y".to_string(),
            sidebar_visible: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// File extensions declared as video (case-insensitive, without dot).
    /// Every other attached file is treated as audio.
    pub video_extensions: Vec<String>,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            video_extensions: ["mp4", "m4v", "mkv", "mov", "webm", "avi", "mpeg", "mpg"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Log file. Defaults to `~/.dj-remix-organizer/organizer.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingSettings {
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
