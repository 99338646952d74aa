use std::{env, path::PathBuf};

use super::schema::Settings;

/// Environment prefix for overrides, e.g. `DJ_ORGANIZER__UI__TOAST_SECONDS=5`.
const ENV_PREFIX: &str = "DJ_ORGANIZER";
/// Environment variable naming an explicit config file.
const CONFIG_PATH_VAR: &str = "DJ_ORGANIZER_CONFIG_PATH";

/// Configuration loading helpers.
///
/// `Settings::load` layers environment variables (prefix `DJ_ORGANIZER__`) over
/// an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.ui.toast_seconds == 0 {
            return Err("ui.toast_seconds must be >= 1".to_string());
        }
        if self.storage.songs_key.trim().is_empty() || self.storage.links_key.trim().is_empty() {
            return Err("storage keys must not be empty".to_string());
        }
        if self.storage.songs_key == self.storage.links_key {
            return Err("storage.songs_key and storage.links_key must differ".to_string());
        }
        if self.backup.file_name.trim().is_empty() {
            return Err("backup.file_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `DJ_ORGANIZER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under
/// `$XDG_CONFIG_HOME/dj-remix-organizer/config.toml` or
/// `~/.config/dj-remix-organizer/config.toml` when `XDG_CONFIG_HOME` is unset.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("dj-remix-organizer").join("config.toml"))
}
