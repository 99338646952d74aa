//! Recoverable rejections raised by the organizer. Everything else travels as
//! `anyhow::Error`; the UI downcasts to this type to decide whether a failure
//! becomes a blocking alert or ends the session.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizerError {
    /// A remix link whose source and target are the same song.
    #[error("Non puoi collegare una canzone a se stessa!")]
    SelfLink,
    /// Backup text that cannot be parsed or lacks `songs`/`links`.
    #[error("Errore nel formato del file di backup.")]
    MalformedBackup { reason: String },
    /// The path typed into the song form does not point at a file.
    #[error("File non trovato: {}", .0.display())]
    MissingMedia(PathBuf),
    /// The song's media reference was issued by an earlier session.
    #[error("File multimediale non disponibile in questa sessione.")]
    MediaUnavailable,
    #[error("Brano non trovato.")]
    SongNotFound,
}

impl OrganizerError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        OrganizerError::MalformedBackup {
            reason: reason.into(),
        }
    }
}
