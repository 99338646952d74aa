use std::cmp::min;
use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::config::Settings;
use crate::error::OrganizerError;
use crate::models::Song;
use crate::state::{Change, Organizer};

use super::forms::{Alert, ConfirmSongDelete, LinkField, LinkForm, PathPrompt, SongField, SongForm};
use super::helpers::{centered_rect, recoverable, surface_error};
use super::screens::{CatalogScreen, Tab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per song card in the catalog.
const SONG_CARD_HEIGHT: u16 = 6;
/// Width of the expanded sidebar.
const SIDEBAR_WIDTH: u16 = 24;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the active tab.
enum Mode {
    Normal,
    Searching(SearchState),
    ConfirmSongDelete(ConfirmSongDelete),
    ImportPrompt(PathPrompt),
    Alert(Alert),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity and age.
struct StatusMessage {
    text: String,
    kind: StatusKind,
    shown_at: Instant,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Presentation options resolved from [`Settings`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub toast_duration: Duration,
    pub sidebar_visible: bool,
    pub export_path: PathBuf,
}

impl AppOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            toast_duration: Duration::from_secs(settings.ui.toast_seconds),
            sidebar_visible: settings.ui.sidebar_visible,
            export_path: settings.backup.export_path(),
        }
    }
}

/// Central application state shared across the TUI. It owns the organizer and
/// keeps derived views (catalog list, remix selectors) in sync with the
/// organizer's change notifications.
pub struct App {
    organizer: Organizer,
    options: AppOptions,
    tab: Tab,
    sidebar_visible: bool,
    catalog: CatalogScreen,
    song_form: SongForm,
    link_form: LinkForm,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(organizer: Organizer, options: AppOptions) -> Self {
        let songs = organizer.songs().to_vec();
        Self {
            link_form: LinkForm::new(&songs),
            catalog: CatalogScreen::new(songs),
            organizer,
            sidebar_visible: options.sidebar_visible,
            options,
            tab: Tab::Catalog,
            song_form: SongForm::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn organizer(&self) -> &Organizer {
        &self.organizer
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        let mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm)?,
            Mode::ImportPrompt(prompt) => self.handle_import_prompt(code, prompt)?,
            Mode::Alert(alert) => self.handle_alert(code, alert),
        };

        self.mode = mode;
        self.apply_changes();
        Ok(exit)
    }

    /// Expire the toast once it has been visible long enough.
    pub(crate) fn tick(&mut self) {
        let expired = self
            .status
            .as_ref()
            .map(|status| status.shown_at.elapsed() >= self.options.toast_duration)
            .unwrap_or(false);
        if expired {
            self.clear_status();
        }
    }

    pub(crate) fn handle_ctrl_b(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
    }

    /// Write the backup file. Only reachable outside modals.
    pub(crate) fn handle_ctrl_x(&mut self) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        let path = self.options.export_path.clone();
        match self.organizer.export_to(&path) {
            Ok(written) => {
                self.set_status(
                    format!("Backup esportato in {}", written.display()),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                tracing::error!(error = %err, "export failed");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    /// Open the import prompt prefilled with the export location.
    pub(crate) fn handle_ctrl_o(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.mode = Mode::ImportPrompt(PathPrompt::with_path(&self.options.export_path));
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::F(1) => {
                self.switch_tab(Tab::Catalog);
                return Ok(Mode::Normal);
            }
            KeyCode::F(2) => {
                self.switch_tab(Tab::AddSong);
                return Ok(Mode::Normal);
            }
            KeyCode::F(3) => {
                self.switch_tab(Tab::Remix);
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        match self.tab {
            Tab::Catalog => Ok(self.handle_catalog_key(code, exit)),
            Tab::AddSong => self.handle_song_form_key(code),
            Tab::Remix => self.handle_link_form_key(code),
        }
    }

    fn handle_catalog_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                if self.catalog.filter.is_some() {
                    self.catalog.set_filter(None);
                }
            }
            KeyCode::Up => self.catalog.move_selection(-1),
            KeyCode::Down => self.catalog.move_selection(1),
            KeyCode::PageUp => self.catalog.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.catalog.move_selection(PAGE_STEP),
            KeyCode::Home => self.catalog.select_first(),
            KeyCode::End => self.catalog.select_last(),
            KeyCode::Char('f') | KeyCode::Char('/') => {
                return Mode::Searching(SearchState {
                    query: self.catalog.filter.clone().unwrap_or_default(),
                });
            }
            KeyCode::Char('+') => self.switch_tab(Tab::AddSong),
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(song) = self.catalog.current_song().cloned() {
                    self.clear_status();
                    return Mode::ConfirmSongDelete(ConfirmSongDelete { song });
                }
                self.set_status("Nessun brano selezionato.", StatusKind::Error);
            }
            KeyCode::Enter => {
                if let Some(song) = self.catalog.current_song().cloned() {
                    self.play_song(&song);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_song_form_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => self.switch_tab(Tab::Catalog),
            KeyCode::Tab | KeyCode::Down => self.song_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.song_form.previous_field(),
            KeyCode::Backspace => self.song_form.backspace(),
            KeyCode::Enter => self.submit_song()?,
            KeyCode::Char(ch) => {
                if self.song_form.push_char(ch) {
                    self.song_form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_link_form_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => self.switch_tab(Tab::Catalog),
            KeyCode::Tab | KeyCode::Down => self.link_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.link_form.previous_field(),
            KeyCode::Left => self.link_form.cycle(-1),
            KeyCode::Right => self.link_form.cycle(1),
            KeyCode::Backspace => self.link_form.backspace(),
            KeyCode::Enter => return self.submit_link(),
            KeyCode::Char(ch) => {
                self.link_form.push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.catalog.set_filter(None);
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.catalog.move_selection(-1),
            KeyCode::Down => self.catalog.move_selection(1),
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }

        self.catalog.set_filter(Some(state.query.clone()));
        Mode::Searching(state)
    }

    fn handle_confirm_song_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmSongDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Eliminazione annullata.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.organizer.delete_song(&confirm.song.id) {
                    Ok(_) => {
                        self.set_status("Brano rimosso.", StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let rejection = recoverable(err)?;
                        self.set_status(rejection.to_string(), StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmSongDelete(confirm)),
        }
    }

    fn handle_import_prompt(&mut self, code: KeyCode, mut prompt: PathPrompt) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Importazione annullata.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Backspace => {
                prompt.backspace();
                Ok(Mode::ImportPrompt(prompt))
            }
            KeyCode::Char(ch) => {
                prompt.push_char(ch);
                Ok(Mode::ImportPrompt(prompt))
            }
            KeyCode::Enter => match self.organizer.import_from(&prompt.path()) {
                Ok(()) => {
                    self.set_status("Backup caricato con successo!", StatusKind::Info);
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    let rejection = recoverable(err)?;
                    Ok(Mode::Alert(Alert::new("Importazione", rejection.to_string())))
                }
            },
            _ => Ok(Mode::ImportPrompt(prompt)),
        }
    }

    fn handle_alert(&mut self, code: KeyCode, alert: Alert) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
            _ => Mode::Alert(alert),
        }
    }

    fn submit_song(&mut self) -> Result<()> {
        match self.organizer.add_song(self.song_form.to_new_song()) {
            Ok(song) => {
                self.song_form = SongForm::default();
                self.apply_changes();
                self.switch_tab(Tab::Catalog);
                self.catalog.focus(&song.id);
                self.set_status("Brano aggiunto alla libreria!", StatusKind::Info);
            }
            Err(err) => {
                let message = recoverable(err)?.to_string();
                self.song_form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
            }
        }
        Ok(())
    }

    fn submit_link(&mut self) -> Result<Mode> {
        let source = self.link_form.source_id().to_string();
        let target = self.link_form.target_id().to_string();
        let notes = self.link_form.notes.clone();

        match self.organizer.add_link(&source, &target, &notes) {
            Ok(_) => {
                self.link_form.reset();
                self.set_status("Collegamento salvato!", StatusKind::Info);
                Ok(Mode::Normal)
            }
            Err(err) => {
                let rejection = recoverable(err)?;
                Ok(Mode::Alert(Alert::new("Attenzione", rejection.to_string())))
            }
        }
    }

    fn play_song(&mut self, song: &Song) {
        if song.media_url.is_none() {
            self.set_status("Nessun file collegato.", StatusKind::Error);
            return;
        }

        match self.organizer.media().play(song) {
            Ok(handle) => {
                let message = format!("In riproduzione: {}", handle.file_name());
                self.set_status(message, StatusKind::Info);
            }
            Err(err) => {
                if err.downcast_ref::<OrganizerError>().is_none() {
                    tracing::warn!(error = %err, "could not start media player");
                }
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    /// Drain organizer notifications and rebuild the views that depend on the
    /// song list.
    fn apply_changes(&mut self) {
        let changes = self.organizer.take_changes();
        if changes.iter().any(Change::touches_songs) {
            let songs = self.organizer.songs().to_vec();
            self.link_form.refresh_selectors(&songs);
            self.catalog.set_songs(songs);
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (main_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let content_area = if self.sidebar_visible && main_area.width > SIDEBAR_WIDTH * 2 {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .split(main_area);
            self.draw_sidebar(frame, chunks[0]);
            chunks[1]
        } else {
            self.draw_tab_bar(frame, main_area)
        };

        match self.tab {
            Tab::Catalog => self.draw_catalog(frame, content_area),
            Tab::AddSong => self.draw_song_form(frame, content_area),
            Tab::Remix => self.draw_link_form(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, content_area, state),
            Mode::ConfirmSongDelete(confirm) => self.draw_confirm_song_delete(frame, area, confirm),
            Mode::ImportPrompt(prompt) => self.draw_import_prompt(frame, area, prompt),
            Mode::Alert(alert) => self.draw_alert(frame, area, alert),
            Mode::Normal => {}
        }
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("DJ Organizer");
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Tab::ALL.len() as u16 + 1),
                Constraint::Min(0),
            ])
            .split(inner);

        let items: Vec<ListItem> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| ListItem::new(format!("F{} {}", idx + 1, tab.title())))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.tab.index()));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let backup = Paragraph::new(vec![
            Line::from(Span::styled(
                "Backup",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![Span::styled("[Ctrl+X]", key_style), Span::raw(" Esporta")]),
            Line::from(vec![Span::styled("[Ctrl+O]", key_style), Span::raw(" Importa")]),
            Line::from(""),
            Line::from(vec![Span::styled("[Ctrl+B]", key_style), Span::raw(" Menu")]),
        ]);
        frame.render_widget(backup, chunks[1]);
    }

    /// One-line tab strip used while the sidebar is collapsed. Returns the
    /// area left for the tab content.
    fn draw_tab_bar(&self, frame: &mut Frame, area: Rect) -> Rect {
        if area.height < 2 {
            return area;
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let titles: Vec<String> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| format!("F{} {}", idx + 1, tab.title()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);
        chunks[1]
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let filter_line = match &self.catalog.filter {
            Some(query) => Line::from(vec![
                Span::raw("Filtro: "),
                Span::styled(query.clone(), Style::default().fg(Color::Yellow)),
            ]),
            None => Line::from(Span::styled(
                "Premi [f] per cercare per titolo, artista o BPM",
                Style::default().fg(Color::DarkGray),
            )),
        };

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("La tua libreria", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  •  "),
                Span::styled(
                    self.catalog.count_badge(),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            filter_line,
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title(Tab::Catalog.title()));
        frame.render_widget(header, chunks[0]);

        if self.catalog.songs.is_empty() {
            let message = Paragraph::new("Nessun brano in libreria. Premi '+' per aggiungerne uno.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        if self.catalog.filtered_songs.is_empty() {
            let message = Paragraph::new("Nessun brano corrisponde alla ricerca.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        self.render_song_cards(
            frame,
            chunks[1],
            &self.catalog.filtered_songs,
            self.catalog.selected,
        );
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, songs: &[Song], selected: usize) {
        if songs.is_empty() || area.height == 0 {
            return;
        }

        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = songs.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let song_index = start + idx;
            if song_index >= len {
                break;
            }

            let song = &songs[song_index];
            let mut block = Block::default().borders(Borders::ALL);
            if song_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }

            let title = if song_index == selected {
                format!("▶ {}", song.title)
            } else {
                song.title.clone()
            };

            let lines = vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    song.artist.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("{} BPM", song.bpm),
                        Style::default().fg(Color::Magenta),
                    ),
                    Span::raw("  "),
                    Span::styled(song.key.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("  •  {}", song.date_added),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                self.media_line(song),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn media_line(&self, song: &Song) -> Line<'static> {
        if song.media_url.is_none() {
            return Line::from(Span::styled(
                "Nessun file collegato",
                Style::default().fg(Color::DarkGray),
            ));
        }

        match self.organizer.media().resolve(song) {
            Some(handle) => Line::from(vec![
                Span::styled(
                    format!("♪ {} • {}", handle.kind, handle.file_name()),
                    Style::default().fg(Color::Green),
                ),
                Span::styled("  [Enter] riproduci", Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(
                "File non disponibile in questa sessione",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Tab::AddSong.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = SongField::ALL
            .iter()
            .map(|field| self.song_form.build_line(*field))
            .collect();

        let (file_label, ready) = self.song_form.file_label();
        let file_style = if ready {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(file_label, file_style)));
        lines.push(Line::from(""));

        if let Some(error) = &self.song_form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter per salvare • Tab per cambiare campo • Esc per tornare alla libreria",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if matches!(self.mode, Mode::Normal) {
            let (row, column) = self.song_form.cursor_offset();
            frame.set_cursor_position((inner.x + column, inner.y + row));
        }
    }

    fn draw_link_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Collega remix")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let form = &self.link_form;
        let selector_line = |label: &str, index: usize, field: LinkField| {
            let style = if form.active == field {
                Style::default().fg(Color::Yellow)
            } else if index == 0 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{label}: ")),
                Span::styled(format!("◀ {} ▶", form.label_at(index)), style),
            ])
        };

        let notes_style = if form.active == LinkField::Notes {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let mut lines = vec![
            selector_line("Brano originale", form.source, LinkField::Source),
            selector_line("Remix / collegato", form.target, LinkField::Target),
            Line::from(vec![
                Span::raw("Note: "),
                Span::styled(form.notes.clone(), notes_style),
            ]),
            Line::from(""),
        ];

        if form.options.is_empty() {
            lines.push(Line::from(Span::styled(
                "Aggiungi almeno due brani per creare un collegamento.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(Span::styled(
            "←/→ per scegliere • Tab per cambiare campo • Enter per salvare",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if matches!(self.mode, Mode::Normal) && form.active == LinkField::Notes {
            let column = "Note: ".len() as u16 + form.notes.chars().count() as u16;
            frame.set_cursor_position((inner.x + column, inner.y + 2));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hint = |pairs: &[(&'static str, &'static str)]| {
            let mut spans = Vec::with_capacity(pairs.len() * 2);
            for (key, action) in pairs {
                spans.push(Span::styled(*key, key_style));
                spans.push(Span::raw(format!(" {action}   ")));
            }
            Line::from(spans)
        };

        match (&self.mode, self.tab) {
            (Mode::Searching(_), _) => hint(&[
                ("[↑↓]", "Seleziona"),
                ("[Enter]", "Conferma"),
                ("[Esc]", "Annulla ricerca"),
            ]),
            (Mode::ConfirmSongDelete(_), _) => hint(&[("[Y]", "Elimina"), ("[N/Esc]", "Annulla")]),
            (Mode::ImportPrompt(_), _) => hint(&[("[Enter]", "Importa"), ("[Esc]", "Annulla")]),
            (Mode::Alert(_), _) => hint(&[("[Enter]", "OK")]),
            (Mode::Normal, Tab::Catalog) => hint(&[
                ("[↑↓]", "Seleziona"),
                ("[Enter]", "Riproduci"),
                ("[f]", "Cerca"),
                ("[+]", "Aggiungi"),
                ("[-]", "Elimina"),
                ("[F1-F3]", "Schede"),
                ("[q]", "Esci"),
            ]),
            (Mode::Normal, Tab::AddSong) => hint(&[
                ("[Tab]", "Campo"),
                ("[Enter]", "Salva"),
                ("[Esc]", "Libreria"),
                ("[F1-F3]", "Schede"),
            ]),
            (Mode::Normal, Tab::Remix) => hint(&[
                ("[←→]", "Scegli"),
                ("[Tab]", "Campo"),
                ("[Enter]", "Collega"),
                ("[Esc]", "Libreria"),
                ("[F1-F3]", "Schede"),
            ]),
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Cerca");
        let paragraph = Paragraph::new(Span::raw(format!("Cerca: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Cerca: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_song_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Elimina brano").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Vuoi davvero eliminare questo brano?"),
            Line::from(Span::styled(
                confirm.song.display_title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Premi Y per confermare oppure N / Esc per annullare.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_import_prompt(&self, frame: &mut Frame, area: Rect, prompt: &PathPrompt) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Importa backup")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(vec![
                Span::raw("File: "),
                Span::styled(prompt.path.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "L'importazione sostituisce l'intera libreria.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + "File: ".len() as u16 + prompt.path.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(alert.title.clone())
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Red));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(Span::styled(
                alert.message.clone(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Premi Enter per chiudere.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn tab(&self) -> Tab {
        self.tab
    }

    pub(crate) fn status(&self) -> Option<(&str, StatusKind)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.kind))
    }

    pub(crate) fn alert_message(&self) -> Option<&str> {
        match &self.mode {
            Mode::Alert(alert) => Some(alert.message.as_str()),
            _ => None,
        }
    }

    pub(crate) fn is_confirming_delete(&self) -> bool {
        matches!(self.mode, Mode::ConfirmSongDelete(_))
    }

    pub(crate) fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Searching(_))
    }

    pub(crate) fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub(crate) fn catalog(&self) -> &CatalogScreen {
        &self.catalog
    }

    pub(crate) fn link_form(&self) -> &LinkForm {
        &self.link_form
    }

    pub(crate) fn song_form(&self) -> &SongForm {
        &self.song_form
    }

    pub(crate) fn age_status(&mut self, by: Duration) {
        if let Some(status) = &mut self.status {
            if let Some(earlier) = status.shown_at.checked_sub(by) {
                status.shown_at = earlier;
            }
        }
    }
}
