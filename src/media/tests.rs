use std::fs;
use std::path::Path;

use super::*;
use crate::config::MediaSettings;

fn registry() -> MediaRegistry {
    MediaRegistry::new(MediaSettings::default().video_extensions)
}

fn song_with(id: &str, media_url: Option<String>) -> Song {
    Song {
        id: id.to_string(),
        media_url,
        ..Song::default()
    }
}

#[test]
fn declared_kind_uses_video_extensions_case_insensitively() {
    let registry = MediaRegistry::new(vec![".MP4".to_string(), "mkv".to_string()]);
    assert_eq!(registry.declared_kind(Path::new("a/clip.mp4")), MediaKind::Video);
    assert_eq!(registry.declared_kind(Path::new("a/clip.MKV")), MediaKind::Video);
    assert_eq!(registry.declared_kind(Path::new("a/track.mp3")), MediaKind::Audio);
    assert_eq!(registry.declared_kind(Path::new("a/no_extension")), MediaKind::Audio);
}

#[test]
fn acquire_requires_an_existing_file() {
    let mut registry = registry();
    let err = registry
        .acquire("1", Path::new("/definitely/not/here.mp3"))
        .unwrap_err();
    assert!(matches!(err, OrganizerError::MissingMedia(_)));
    assert!(registry.is_empty());
}

#[test]
fn acquired_handles_resolve_only_for_matching_urls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("set.mp4");
    fs::write(&path, b"fake").unwrap();

    let mut registry = registry();
    let handle = registry.acquire("42", &path).unwrap();
    assert_eq!(handle.kind, MediaKind::Video);
    assert_eq!(handle.file_name(), "set.mp4");
    assert!(handle
        .url
        .starts_with(&format!("session://{}/", registry.session_id())));

    let song = song_with("42", Some(handle.url.clone()));
    assert_eq!(registry.resolve(&song), Some(&handle));

    let stale = song_with("42", Some("session://old-session/42".to_string()));
    assert_eq!(registry.resolve(&stale), None);

    let no_media = song_with("42", None);
    assert_eq!(registry.resolve(&no_media), None);
}

#[test]
fn urls_from_another_session_never_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.mp3");
    fs::write(&path, b"fake").unwrap();

    let mut first = registry();
    let url = first.acquire("7", &path).unwrap().url;
    drop(first);

    let second = registry();
    assert_eq!(second.resolve(&song_with("7", Some(url))), None);
}

#[test]
fn release_and_clear_drop_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.wav");
    fs::write(&path, b"fake").unwrap();

    let mut registry = registry();
    registry.acquire("1", &path).unwrap();
    registry.acquire("2", &path).unwrap();
    assert_eq!(registry.len(), 2);

    assert!(registry.release("1").is_some());
    assert!(registry.release("1").is_none());
    assert_eq!(registry.len(), 1);

    assert_eq!(registry.clear(), 1);
    assert!(registry.is_empty());
}

#[test]
fn retain_referenced_keeps_only_matching_songs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.flac");
    fs::write(&path, b"fake").unwrap();

    let mut registry = registry();
    let kept = registry.acquire("1", &path).unwrap();
    registry.acquire("2", &path).unwrap();
    registry.acquire("3", &path).unwrap();

    registry.retain_referenced(&[
        song_with("1", Some(kept.url.clone())),
        song_with("2", Some("session://elsewhere/2".to_string())),
    ]);

    assert_eq!(registry.len(), 1);
    assert!(registry.resolve(&song_with("1", Some(kept.url))).is_some());
}

#[test]
fn play_rejects_songs_without_a_live_handle() {
    let registry = registry();
    let err = registry
        .play(&song_with("9", Some("session://gone/9".to_string())))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OrganizerError>(),
        Some(OrganizerError::MediaUnavailable)
    ));
}
