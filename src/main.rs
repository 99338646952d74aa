//! Binary entry point: load settings, start logging, open the SQLite store,
//! hydrate the organizer, and drive the Ratatui event loop until the user
//! exits.
use anyhow::Context;
use dj_remix_organizer::logging::init_logging;
use dj_remix_organizer::{
    ensure_schema, run_app, App, AppOptions, MediaRegistry, Organizer, Settings, Store,
};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    settings.validate().map_err(anyhow::Error::msg)?;
    let log_path = init_logging(&settings.logging)?;

    let db_path = settings.storage.database_path()?;
    let conn = ensure_schema(&db_path)?;
    let store = Store::new(conn, &settings.storage);
    let media = MediaRegistry::new(settings.media.video_extensions.clone());
    let organizer = Organizer::open(store, media, &settings.ui.date_format)?;
    tracing::info!(
        db = %db_path.display(),
        log = %log_path.display(),
        songs = organizer.songs().len(),
        links = organizer.links().len(),
        "organizer ready"
    );

    let mut app = App::new(organizer, AppOptions::from_settings(&settings));
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "event loop aborted");
    }
    result
}
