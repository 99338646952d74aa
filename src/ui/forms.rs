use std::path::{Path, PathBuf};

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{NewSong, Song};

/// Label of the empty choice at the top of both remix selectors.
pub(crate) const SELECT_PLACEHOLDER: &str = "Seleziona...";

/// Form state for the "add song" tab.
#[derive(Default, Clone)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) bpm: String,
    pub(crate) key: String,
    pub(crate) media_path: String,
    pub(crate) active: SongField,
    pub(crate) error: Option<String>,
}

/// Fields of the song form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum SongField {
    #[default]
    Title,
    Artist,
    Bpm,
    Key,
    File,
}

impl SongField {
    pub(crate) const ALL: [SongField; 5] = [
        SongField::Title,
        SongField::Artist,
        SongField::Bpm,
        SongField::Key,
        SongField::File,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            SongField::Title => "Titolo",
            SongField::Artist => "Artista",
            SongField::Bpm => "BPM",
            SongField::Key => "Tonalità",
            SongField::File => "File",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            SongField::Title => "<titolo>",
            SongField::Artist => "<artista>",
            SongField::Bpm => "<opzionale, es. 126>",
            SongField::Key => "<opzionale, es. Cm>",
            SongField::File => "<percorso audio/video, opzionale>",
        }
    }

    fn row(self) -> usize {
        SongField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl SongForm {
    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.row() + 1) % SongField::ALL.len();
        self.active = SongField::ALL[next];
    }

    /// Move focus to the previous field, wrapping around.
    pub(crate) fn previous_field(&mut self) {
        let len = SongField::ALL.len();
        let previous = (self.active.row() + len - 1) % len;
        self.active = SongField::ALL[previous];
    }

    /// Insert a character into the active field. The tempo only takes digits
    /// and a decimal point.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        if self.active == SongField::Bpm && !(ch.is_ascii_digit() || ch == '.') {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Raw values ready for the organizer. Text is passed through untouched;
    /// the file path is trimmed and dropped when blank.
    pub(crate) fn to_new_song(&self) -> NewSong {
        let media = self.media_path.trim();
        NewSong {
            title: self.title.clone(),
            artist: self.artist.clone(),
            bpm: self.bpm.clone(),
            key: self.key.clone(),
            media: (!media.is_empty()).then(|| PathBuf::from(media)),
        }
    }

    /// Feedback shown under the file field, plus whether a file is ready.
    pub(crate) fn file_label(&self) -> (String, bool) {
        let raw = self.media_path.trim();
        if raw.is_empty() {
            return ("Inserisci il percorso di un file audio o video".to_string(), false);
        }

        let path = Path::new(raw);
        if path.is_file() {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| raw.to_string());
            (format!("File pronto: {name}"), true)
        } else {
            ("Nessun file trovato a questo percorso".to_string(), false)
        }
    }

    /// Render a styled `Label: value` line for the form.
    pub(crate) fn build_line(&self, field: SongField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor offset (row, column) of the active field inside the form body.
    pub(crate) fn cursor_offset(&self) -> (u16, u16) {
        let field = self.active;
        let prefix = field.label().chars().count() + 2;
        let column = prefix + self.value(field).chars().count();
        (field.row() as u16, column as u16)
    }

    fn value(&self, field: SongField) -> &str {
        match field {
            SongField::Title => &self.title,
            SongField::Artist => &self.artist,
            SongField::Bpm => &self.bpm,
            SongField::Key => &self.key,
            SongField::File => &self.media_path,
        }
    }

    fn value_mut(&mut self, field: SongField) -> &mut String {
        match field {
            SongField::Title => &mut self.title,
            SongField::Artist => &mut self.artist,
            SongField::Bpm => &mut self.bpm,
            SongField::Key => &mut self.key,
            SongField::File => &mut self.media_path,
        }
    }
}

/// One entry of a remix selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SongOption {
    pub(crate) id: String,
    pub(crate) label: String,
}

/// Fields of the remix form.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum LinkField {
    #[default]
    Source,
    Target,
    Notes,
}

/// Form state for the remix tab. Selector indices count the placeholder as
/// position zero.
#[derive(Default, Clone)]
pub(crate) struct LinkForm {
    pub(crate) options: Vec<SongOption>,
    pub(crate) source: usize,
    pub(crate) target: usize,
    pub(crate) notes: String,
    pub(crate) active: LinkField,
}

impl LinkForm {
    pub(crate) fn new(songs: &[Song]) -> Self {
        let mut form = Self::default();
        form.refresh_selectors(songs);
        form
    }

    /// Rebuild both option lists from `songs`. A selection whose song is gone
    /// falls back to the placeholder.
    pub(crate) fn refresh_selectors(&mut self, songs: &[Song]) {
        let source_id = self.source_id().to_string();
        let target_id = self.target_id().to_string();

        self.options = songs
            .iter()
            .map(|song| SongOption {
                id: song.id.clone(),
                label: song.selector_label(),
            })
            .collect();

        self.source = self.index_of(&source_id);
        self.target = self.index_of(&target_id);
    }

    /// Number of choices in each selector, placeholder included.
    pub(crate) fn choice_count(&self) -> usize {
        self.options.len() + 1
    }

    /// Song id behind the source selection, empty for the placeholder.
    pub(crate) fn source_id(&self) -> &str {
        self.id_at(self.source)
    }

    /// Song id behind the target selection, empty for the placeholder.
    pub(crate) fn target_id(&self) -> &str {
        self.id_at(self.target)
    }

    pub(crate) fn label_at(&self, index: usize) -> &str {
        index
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(|option| option.label.as_str())
            .unwrap_or(SELECT_PLACEHOLDER)
    }

    /// Step the active selector by `delta`, wrapping around.
    pub(crate) fn cycle(&mut self, delta: isize) {
        let len = self.choice_count() as isize;
        let slot = match self.active {
            LinkField::Source => &mut self.source,
            LinkField::Target => &mut self.target,
            LinkField::Notes => return,
        };
        *slot = (*slot as isize + delta).rem_euclid(len) as usize;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            LinkField::Source => LinkField::Target,
            LinkField::Target => LinkField::Notes,
            LinkField::Notes => LinkField::Source,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            LinkField::Source => LinkField::Notes,
            LinkField::Target => LinkField::Source,
            LinkField::Notes => LinkField::Target,
        };
    }

    /// Only the notes field takes free text.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() || self.active != LinkField::Notes {
            return false;
        }
        self.notes.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        if self.active == LinkField::Notes {
            self.notes.pop();
        }
    }

    /// Clear the inputs while keeping the option lists.
    pub(crate) fn reset(&mut self) {
        self.source = 0;
        self.target = 0;
        self.notes.clear();
        self.active = LinkField::Source;
    }

    fn id_at(&self, index: usize) -> &str {
        index
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(|option| option.id.as_str())
            .unwrap_or("")
    }

    fn index_of(&self, id: &str) -> usize {
        if id.is_empty() {
            return 0;
        }
        self.options
            .iter()
            .position(|option| option.id == id)
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }
}

/// Free-text prompt for the backup file to import.
#[derive(Default, Clone)]
pub(crate) struct PathPrompt {
    pub(crate) path: String,
}

impl PathPrompt {
    pub(crate) fn with_path(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.path.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.path.pop();
    }

    pub(crate) fn path(&self) -> PathBuf {
        PathBuf::from(self.path.trim())
    }
}

/// State for confirming permanent song deletion.
pub(crate) struct ConfirmSongDelete {
    pub(crate) song: Song,
}

/// Blocking message that must be dismissed before anything else happens.
pub(crate) struct Alert {
    pub(crate) title: String,
    pub(crate) message: String,
}

impl Alert {
    pub(crate) fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}
