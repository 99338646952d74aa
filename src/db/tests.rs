use super::*;
use crate::config::StorageSettings;
use crate::error::OrganizerError;
use crate::models::{Library, Link, MediaKind, Song};

fn memory_store() -> Store {
    Store::new(open_in_memory().unwrap(), &StorageSettings::default())
}

fn levels() -> Song {
    Song {
        id: "1700000000000".to_string(),
        title: "Levels".to_string(),
        artist: "Avicii".to_string(),
        bpm: "126".to_string(),
        key: "Cm".to_string(),
        media_url: None,
        file_type: None,
        date_added: "01/02/2024".to_string(),
    }
}

fn sample_library() -> Library {
    let mut clip = levels();
    clip.id = "1700000000001".to_string();
    clip.title = "Clip".to_string();
    clip.media_url = Some("session://stale/1700000000001".to_string());
    clip.file_type = Some(MediaKind::Video);

    Library {
        songs: vec![levels(), clip],
        links: vec![Link {
            id: 1700000000002,
            source: "1700000000000".to_string(),
            target: "1700000000001".to_string(),
            notes: "intro mashup".to_string(),
        }],
    }
}

#[test]
fn load_defaults_to_empty_when_keys_are_absent() {
    let store = memory_store();
    assert_eq!(store.load().unwrap(), Library::default());
}

#[test]
fn load_defaults_to_empty_when_records_do_not_parse() {
    let store = memory_store();
    store.set("dj_pro_songs", "{not json").unwrap();
    store.set("dj_pro_links", "null").unwrap();

    assert_eq!(store.load().unwrap(), Library::default());
}

#[test]
fn save_overwrites_both_records() {
    let store = memory_store();
    let library = sample_library();

    store.save(&library.songs, &library.links).unwrap();
    assert_eq!(store.load().unwrap(), library);

    store.save(&library.songs[..1], &[]).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.songs, vec![levels()]);
    assert!(reloaded.links.is_empty());
}

#[test]
fn records_use_the_persisted_field_names() {
    let store = memory_store();
    let library = sample_library();
    store.save(&library.songs, &library.links).unwrap();

    let raw = store.get("dj_pro_songs").unwrap().unwrap();
    assert!(raw.contains("\"mediaUrl\":null"));
    assert!(raw.contains("\"fileType\":\"video\""));
    assert!(raw.contains("\"dateAdded\":\"01/02/2024\""));

    let raw_links = store.get("dj_pro_links").unwrap().unwrap();
    assert!(raw_links.contains("\"id\":1700000000002"));
    assert!(raw_links.contains("\"source\":\"1700000000000\""));
}

#[test]
fn custom_keys_are_honoured() {
    let settings = StorageSettings {
        songs_key: "songs".to_string(),
        links_key: "links".to_string(),
        ..StorageSettings::default()
    };
    let store = Store::new(open_in_memory().unwrap(), &settings);
    let library = sample_library();
    store.save(&library.songs, &library.links).unwrap();

    assert!(store.get("songs").unwrap().is_some());
    assert!(store.get("dj_pro_songs").unwrap().is_none());
}

#[test]
fn on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("organizer.sqlite");
    let library = sample_library();

    {
        let store = Store::new(ensure_schema(&path).unwrap(), &StorageSettings::default());
        store.save(&library.songs, &library.links).unwrap();
    }

    let store = Store::new(ensure_schema(&path).unwrap(), &StorageSettings::default());
    assert_eq!(store.load().unwrap(), library);
}

#[test]
fn backup_is_pretty_printed_object() {
    let json = to_backup_json(&sample_library()).unwrap();
    assert!(json.starts_with("{\n  \"songs\": ["));
    assert!(json.contains("\n  \"links\": ["));
}

#[test]
fn backup_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dj_organizer_backup.json");
    let library = sample_library();

    write_backup(&path, &library).unwrap();
    assert_eq!(read_backup(&path).unwrap(), library);
}

#[test]
fn parse_rejects_unparsable_text() {
    let err = parse_backup("this is not json").unwrap_err();
    assert!(matches!(err, OrganizerError::MalformedBackup { .. }));
}

#[test]
fn parse_requires_both_top_level_fields() {
    assert!(parse_backup(r#"{"songs": []}"#).is_err());
    assert!(parse_backup(r#"{"links": []}"#).is_err());
    assert!(parse_backup(r#"{"songs": null, "links": []}"#).is_err());
    assert!(parse_backup("[]").is_err());

    let empty = parse_backup(r#"{"songs": [], "links": []}"#).unwrap();
    assert_eq!(empty, Library::default());
}

#[test]
fn parse_rejects_collections_that_are_not_arrays() {
    assert!(parse_backup(r#"{"songs": "nope", "links": []}"#).is_err());
    assert!(parse_backup(r#"{"songs": [], "links": [42]}"#).is_err());
}

#[test]
fn parse_accepts_partially_malformed_records() {
    let library = parse_backup(
        r#"{
            "songs": [{"title": "No id", "bpm": 128, "fileType": "hologram"}],
            "links": [{"source": "a", "target": "b"}],
            "extra": true
        }"#,
    )
    .unwrap();

    let song = &library.songs[0];
    assert_eq!(song.id, "");
    assert_eq!(song.title, "No id");
    assert_eq!(song.bpm, "128");
    assert_eq!(song.file_type, None);
    assert_eq!(song.media_url, None);

    let link = &library.links[0];
    assert_eq!(link.id, 0);
    assert_eq!(link.notes, "");
}

#[test]
fn parse_blanks_fields_holding_objects_or_arrays() {
    let library = parse_backup(
        r#"{
            "songs": [{"id": "1", "title": {"nested": true}, "artist": ["a", "b"], "bpm": 120}],
            "links": [{"id": [1], "source": "1", "target": {}, "notes": "n"}]
        }"#,
    )
    .unwrap();

    let song = &library.songs[0];
    assert_eq!(song.id, "1");
    assert_eq!(song.title, "");
    assert_eq!(song.artist, "");
    assert_eq!(song.bpm, "120");

    let link = &library.links[0];
    assert_eq!(link.id, 0);
    assert_eq!(link.target, "");
    assert_eq!(link.notes, "n");
}

#[test]
fn read_backup_reports_missing_file_as_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_backup(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, OrganizerError::MalformedBackup { .. }));
}
