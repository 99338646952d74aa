use crate::models::Song;
use crate::state::filter_songs;

/// Top-level tabs reachable from the sidebar.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Tab {
    Catalog,
    AddSong,
    Remix,
}

impl Tab {
    pub(crate) const ALL: [Tab; 3] = [Tab::Catalog, Tab::AddSong, Tab::Remix];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Catalog => "Libreria",
            Tab::AddSong => "Aggiungi brano",
            Tab::Remix => "Remix",
        }
    }

    pub(crate) fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }
}

/// Count badge shown above the catalog.
pub(crate) fn count_badge(count: usize) -> String {
    format!("{count} Brani")
}

/// Song list behind the catalog tab plus its live filter.
pub(crate) struct CatalogScreen {
    pub(crate) songs: Vec<Song>,
    pub(crate) filtered_songs: Vec<Song>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl CatalogScreen {
    pub(crate) fn new(songs: Vec<Song>) -> Self {
        let mut screen = Self {
            filtered_songs: Vec::new(),
            songs,
            filter: None,
            selected: 0,
        };
        screen.apply_filter();
        screen
    }

    pub(crate) fn apply_filter(&mut self) {
        let query = self.filter.as_deref().unwrap_or("");
        self.filtered_songs = filter_songs(&self.songs, query)
            .into_iter()
            .cloned()
            .collect();
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|query| !query.is_empty());
        self.apply_filter();
    }

    pub(crate) fn set_songs(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.apply_filter();
    }

    pub(crate) fn count_badge(&self) -> String {
        count_badge(self.filtered_songs.len())
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.filtered_songs.get(self.selected)
    }

    /// Select the visible song with `id`, if it passes the filter.
    pub(crate) fn focus(&mut self, id: &str) {
        if let Some(idx) = self.filtered_songs.iter().position(|song| song.id == id) {
            self.selected = idx;
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered_songs.is_empty() {
            return;
        }
        let last = self.filtered_songs.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered_songs.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered_songs.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered_songs.len() {
            self.selected = self.filtered_songs.len() - 1;
        }
    }
}
