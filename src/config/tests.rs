use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        std::env::set_var(key, val);
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        std::env::remove_var(key);
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_variable() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("DJ_ORGANIZER_CONFIG_PATH", "/tmp/dj-organizer-test.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/dj-organizer-test.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("dj-remix-organizer")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("dj-remix-organizer")
            .join("config.toml")
    );
}

#[test]
fn default_storage_keys_and_ui_settings() {
    let settings = Settings::default();
    assert_eq!(settings.storage.songs_key, "dj_pro_songs");
    assert_eq!(settings.storage.links_key, "dj_pro_links");
    assert_eq!(settings.backup.file_name, "dj_organizer_backup.json");
    assert_eq!(settings.ui.toast_seconds, 3);
    assert!(settings.ui.sidebar_visible);
    assert!(settings
        .media
        .video_extensions
        .iter()
        .any(|ext| ext == "mp4"));
    assert!(settings.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let mut settings = Settings::default();
    settings.ui.toast_seconds = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.storage.links_key = settings.storage.songs_key.clone();
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.storage.songs_key = "  ".to_string();
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.backup.file_name = String::new();
    assert!(settings.validate().is_err());
}

#[test]
fn export_path_joins_configured_directory() {
    let backup = BackupSettings {
        export_dir: Some(PathBuf::from("/tmp/exports")),
        ..BackupSettings::default()
    };
    assert_eq!(
        backup.export_path(),
        PathBuf::from("/tmp/exports/dj_organizer_backup.json")
    );
}

#[test]
fn explicit_storage_and_log_paths_win() {
    let storage = StorageSettings {
        database_path: Some(PathBuf::from("/tmp/organizer.sqlite")),
        ..StorageSettings::default()
    };
    assert_eq!(
        storage.database_path().unwrap(),
        PathBuf::from("/tmp/organizer.sqlite")
    );

    let logging = LoggingSettings {
        file: Some(PathBuf::from("/tmp/organizer.log")),
        ..LoggingSettings::default()
    };
    assert_eq!(
        logging.log_path().unwrap(),
        PathBuf::from("/tmp/organizer.log")
    );
}

#[test]
fn load_reads_file_and_environment_overrides() {
    let _lock = env_lock();
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(
        file,
        "[ui]\ntoast_seconds = 7\ndate_format = \"%Y-%m-%d\"\n\n[storage]\nsongs_key = \"songs\"\nlinks_key = \"links\"\n"
    )
    .unwrap();

    let path = file.path().to_string_lossy().to_string();
    let _g1 = EnvGuard::set("DJ_ORGANIZER_CONFIG_PATH", &path);
    let _g2 = EnvGuard::set("DJ_ORGANIZER__UI__SIDEBAR_VISIBLE", "false");

    let settings = Settings::load().unwrap();
    assert_eq!(settings.ui.toast_seconds, 7);
    assert_eq!(settings.ui.date_format, "%Y-%m-%d");
    assert!(!settings.ui.sidebar_visible);
    assert_eq!(settings.storage.songs_key, "songs");
    assert_eq!(settings.storage.links_key, "links");
    assert_eq!(settings.backup.file_name, "dj_organizer_backup.json");
}

#[test]
fn load_without_file_uses_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set(
        "DJ_ORGANIZER_CONFIG_PATH",
        "/tmp/dj-organizer-missing-config-file.toml",
    );
    let _g2 = EnvGuard::remove("DJ_ORGANIZER__UI__SIDEBAR_VISIBLE");

    let settings = Settings::load().unwrap();
    assert_eq!(settings.ui.toast_seconds, 3);
    assert_eq!(settings.storage.songs_key, "dj_pro_songs");
}
