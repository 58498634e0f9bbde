use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::ops::Range;
use termtube_extract::VideoRecord;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Searching,
    Displaying,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Start a search. `id` comes back with its results.
    Search { id: u64, query: String },
    Launch(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// UI state. Every transition is driven from here so it can be tested
/// without a terminal.
pub struct App {
    pub mode: Mode,
    pub query: String,
    pub query_cursor: usize,
    pub results: Vec<VideoRecord>,
    pub selected: usize,
    pub page_size: usize,
    pub status: Option<(String, StatusKind)>,
    busy: u32,
    spin_idx: usize,
    latest_search: u64,
    pub dirty: bool,
}

impl App {
    pub fn new(page_size: usize) -> Self {
        Self {
            mode: Mode::Searching,
            query: String::new(),
            query_cursor: 0,
            results: Vec::new(),
            selected: 0,
            page_size: page_size.max(1),
            status: None,
            busy: 0,
            spin_idx: 0,
            latest_search: 0,
            dirty: true,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy > 0
    }

    pub fn spinner(&self) -> &'static str {
        if self.busy > 0 {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    pub fn step_spinner(&mut self) {
        if self.busy > 0 {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn set_busy(&mut self, on: bool) {
        if on {
            self.busy = self.busy.saturating_add(1)
        } else {
            self.busy = self.busy.saturating_sub(1)
        }
        self.dirty = true;
    }

    pub fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some((text.into(), kind));
        self.dirty = true;
    }

    /// Rows currently on screen. The window slides so the selection stays
    /// on its last row once it moves past the first page.
    pub fn page_window(&self) -> Range<usize> {
        let start = if self.selected >= self.page_size {
            self.selected - self.page_size + 1
        } else {
            0
        };
        let end = (start + self.page_size).min(self.results.len());
        start.min(end)..end
    }

    pub fn selected_record(&self) -> Option<&VideoRecord> {
        self.results.get(self.selected)
    }

    /// Store the outcome of a search started by [`Action::Search`].
    ///
    /// Only the most recently started search may change the list; results
    /// of an older one just end its spinner turn. Returns whether `id` was
    /// current.
    pub fn finish_search(
        &mut self,
        id: u64,
        query: &str,
        result: Result<Vec<VideoRecord>, String>,
    ) -> bool {
        self.set_busy(false);
        if id != self.latest_search {
            return false;
        }
        match result {
            Ok(records) => {
                let count = records.len();
                self.results = records;
                self.selected = 0;
                self.mode = Mode::Displaying;
                self.set_status(format!("{count} result(s) for \"{query}\""), StatusKind::Info);
            }
            Err(e) => {
                self.set_status(format!("search failed: {e}"), StatusKind::Error);
            }
        }
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        self.dirty = true;
        match self.mode {
            Mode::Searching => self.handle_search_key(key),
            Mode::Displaying => self.handle_list_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                let query = self.query.trim().to_string();
                if query.is_empty() {
                    return Action::None;
                }
                self.set_busy(true);
                self.latest_search += 1;
                self.set_status(format!("searching \"{query}\""), StatusKind::Info);
                return Action::Search {
                    id: self.latest_search,
                    query,
                };
            }
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.query_cursor = 0,
            KeyCode::End => self.query_cursor = self.query.len(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Esc => {
                if self.query.is_empty() && !self.results.is_empty() {
                    self.mode = Mode::Displaying;
                } else {
                    self.query.clear();
                    self.query_cursor = 0;
                }
            }
            KeyCode::Char(ch) => self.insert_char(ch),
            _ => {}
        }
        Action::None
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Action {
        let last = self.results.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.selected = (self.selected + self.page_size).min(last);
            }
            KeyCode::PageUp => {
                self.selected = self.selected.saturating_sub(self.page_size);
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = last,
            KeyCode::Enter => {
                if self.selected < self.results.len() {
                    return Action::Launch(self.selected);
                }
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.mode = Mode::Searching;
            }
            _ => {}
        }
        Action::None
    }

    fn cursor_left(&mut self) {
        if self.query_cursor == 0 {
            return;
        }
        self.query_cursor -= 1;
        while self.query_cursor > 0 && !self.query.is_char_boundary(self.query_cursor) {
            self.query_cursor -= 1;
        }
    }

    fn cursor_right(&mut self) {
        if self.query_cursor >= self.query.len() {
            return;
        }
        self.query_cursor += 1;
        while self.query_cursor < self.query.len()
            && !self.query.is_char_boundary(self.query_cursor)
        {
            self.query_cursor += 1;
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.query.insert(self.query_cursor, ch);
        self.query_cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.query_cursor == 0 {
            return;
        }
        let mut prev = self.query_cursor - 1;
        while prev > 0 && !self.query.is_char_boundary(prev) {
            prev -= 1;
        }
        self.query.drain(prev..self.query_cursor);
        self.query_cursor = prev;
    }
}

#[cfg(test)]
impl App {
    /// An app showing the results of one completed search.
    pub(crate) fn with_results(page_size: usize, query: &str, records: Vec<VideoRecord>) -> Self {
        let mut app = App::new(page_size);
        app.query = query.to_string();
        app.query_cursor = app.query.len();
        app.set_busy(true);
        app.latest_search = 1;
        app.finish_search(1, query, Ok(records));
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn records(n: usize) -> Vec<VideoRecord> {
        (0..n)
            .map(|i| VideoRecord {
                id_or_path: format!("/watch?v={i:011}"),
                title: format!("video {i}"),
                ..Default::default()
            })
            .collect()
    }

    fn start_search(app: &mut App, query: &str) -> u64 {
        app.query.clear();
        app.query_cursor = 0;
        app.mode = Mode::Searching;
        type_str(app, query);
        match app.handle_key(key(KeyCode::Enter)) {
            Action::Search { id, .. } => id,
            other => panic!("expected a search, got {other:?}"),
        }
    }

    fn displaying(n: usize, page_size: usize) -> App {
        App::with_results(page_size, "q", records(n))
    }

    #[test]
    fn typing_and_enter_starts_a_search() {
        let mut app = App::new(10);
        type_str(&mut app, "  rust talks ");
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Action::Search {
                id: 1,
                query: "rust talks".into()
            }
        );
        assert!(app.is_busy());
    }

    #[test]
    fn empty_query_does_nothing() {
        let mut app = App::new(10);
        type_str(&mut app, "   ");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
        assert!(!app.is_busy());
    }

    #[test]
    fn q_is_text_while_searching_and_quit_while_displaying() {
        let mut app = App::new(10);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.query, "q");

        let mut app = displaying(3, 10);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let mut app = App::new(10);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Action::Quit);
    }

    #[test]
    fn backspace_respects_multibyte_chars() {
        let mut app = App::new(10);
        type_str(&mut app, "café");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.query, "caf");
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Char('X')));
        assert_eq!(app.query, "caXf");
    }

    #[test]
    fn successful_search_switches_to_the_list() {
        let mut app = App::new(10);
        let id = start_search(&mut app, "rust");
        assert!(app.finish_search(id, "rust", Ok(records(2))));
        assert_eq!(app.mode, Mode::Displaying);
        assert_eq!(app.selected, 0);
        assert!(!app.is_busy());
    }

    #[test]
    fn failed_search_stays_in_search_mode_with_an_error() {
        let mut app = App::new(10);
        let id = start_search(&mut app, "rust");
        app.finish_search(id, "rust", Err("network error: timeout".into()));
        assert_eq!(app.mode, Mode::Searching);
        assert!(matches!(app.status, Some((_, StatusKind::Error))));
    }

    #[test]
    fn j_and_k_clamp_to_the_list() {
        let mut app = displaying(3, 10);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.selected, 0);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(app.selected, 2);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn enter_launches_the_selected_record() {
        let mut app = displaying(3, 10);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Launch(1));
        assert_eq!(app.selected_record().unwrap().title, "video 1");
    }

    #[test]
    fn enter_on_empty_results_does_nothing() {
        let mut app = displaying(0, 10);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(app.page_window(), 0..0);
    }

    #[test]
    fn page_window_follows_the_selection() {
        let mut app = displaying(25, 10);
        assert_eq!(app.page_window(), 0..10);
        app.selected = 9;
        assert_eq!(app.page_window(), 0..10);
        app.selected = 10;
        assert_eq!(app.page_window(), 1..11);
        app.selected = 24;
        assert_eq!(app.page_window(), 15..25);
    }

    #[test]
    fn page_window_is_clamped_to_short_lists() {
        let app = displaying(4, 10);
        assert_eq!(app.page_window(), 0..4);
    }

    #[test]
    fn esc_goes_back_to_search_and_back_again() {
        let mut app = displaying(2, 10);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Searching);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Displaying);
    }

    #[test]
    fn spinner_only_turns_while_busy() {
        let mut app = App::new(10);
        assert_eq!(app.spinner(), " ");
        type_str(&mut app, "x");
        app.handle_key(key(KeyCode::Enter));
        let first = app.spinner();
        app.step_spinner();
        assert_ne!(app.spinner(), first);
    }

    #[test]
    fn results_of_an_older_search_are_dropped() {
        let mut app = App::new(10);
        let first = start_search(&mut app, "old");
        let second = start_search(&mut app, "new");
        assert_ne!(first, second);

        assert!(app.finish_search(second, "new", Ok(records(2))));
        assert!(app.is_busy());
        assert!(!app.finish_search(first, "old", Ok(records(7))));

        assert_eq!(app.results.len(), 2);
        assert!(!app.is_busy());
        assert_eq!(
            app.status,
            Some(("2 result(s) for \"new\"".to_string(), StatusKind::Info))
        );
    }
}
