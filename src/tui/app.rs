use crate::index::SubstringIndex;
use crate::query::{NameSearch, SearchOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Help,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    /// Exit and print this name
    Pick(String),
}

/// LRU cache size for search results (larger = more memory, faster re-queries)
const SEARCH_CACHE_SIZE: usize = 64;

/// Rows listed when no explicit limit is configured
const DEFAULT_VISIBLE_LIMIT: usize = 1000;

const PAGE: usize = 10;

#[derive(Clone)]
struct CachedSearch {
    names: Vec<String>,
    total: usize,
}

/// Picker state
pub struct App {
    index: SubstringIndex,
    options: SearchOptions,
    pub query: String,
    pub results: Vec<String>,
    /// Matches before the row limit
    pub total: usize,
    pub selected: usize,
    pub mode: Mode,
    pub status_message: String,
    /// Pending key for vim multi-key commands (e.g., 'g' for 'gg')
    pub pending_key: Option<char>,
    last_elapsed: Option<Duration>,
    /// LRU cache of recent search results for instant recall
    search_cache: LruCache<String, CachedSearch>,
}

impl App {
    pub fn new(index: SubstringIndex, mut options: SearchOptions) -> Self {
        if options.limit == 0 {
            options.limit = DEFAULT_VISIBLE_LIMIT;
        }
        let status_message = format!("{} names indexed", index.len());

        let mut app = Self {
            index,
            options,
            query: String::new(),
            results: Vec::new(),
            total: 0,
            selected: 0,
            mode: Mode::Search,
            status_message,
            pending_key: None,
            last_elapsed: None,
            search_cache: LruCache::new(
                NonZeroUsize::new(SEARCH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
        };
        app.execute_search();
        app
    }

    pub fn index(&self) -> &SubstringIndex {
        &self.index
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.execute_search();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.execute_search();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.execute_search();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.execute_search();
        }
    }

    /// Delete word backward from query (vim Ctrl+w)
    pub fn delete_word(&mut self) {
        let trimmed = self.query.trim_end_matches(' ');
        let cut = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.query.truncate(cut);
        self.execute_search();
    }

    /// Refresh results for the current query
    pub fn execute_search(&mut self) {
        self.selected = 0;

        if let Some(cached) = self.search_cache.get(&self.query) {
            self.results = cached.names.clone();
            self.total = cached.total;
            self.last_elapsed = None;
            self.update_status();
            return;
        }

        let (names, total, elapsed) = {
            let mut search = NameSearch::new(&self.index);
            let outcome = search.execute(&self.query, &self.options);
            let names: Vec<String> = outcome.names.iter().map(|name| name.to_string()).collect();
            (names, outcome.total, outcome.elapsed)
        };

        self.search_cache.put(
            self.query.clone(),
            CachedSearch {
                names: names.clone(),
                total,
            },
        );
        self.results = names;
        self.total = total;
        self.last_elapsed = Some(elapsed);
        self.update_status();
    }

    fn update_status(&mut self) {
        let shown = self.results.len();
        let mut status = if shown < self.total {
            format!("{} of {} matches", shown, self.total)
        } else {
            format!("{} matches", self.total)
        };
        match self.last_elapsed {
            Some(elapsed) => status.push_str(&format!(" ({:.2}ms)", elapsed.as_secs_f64() * 1000.0)),
            None => status.push_str(" (cached)"),
        }
        self.status_message = status;
    }

    /// Drop the selected name from the index
    pub fn remove_selected(&mut self) {
        if !self.index.supports_remove() {
            self.status_message = "Removal is disabled for this index".to_string();
            return;
        }
        let Some(name) = self.results.get(self.selected).cloned() else {
            return;
        };

        let selected = self.selected;
        if self.index.remove(&name) {
            self.search_cache.clear();
            self.execute_search();
            self.selected = selected.min(self.results.len().saturating_sub(1));
            self.status_message = format!("Removed {:?}, {} names left", name, self.index.len());
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.results.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_page_down(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + PAGE).min(self.results.len() - 1);
        }
    }

    pub fn select_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(PAGE);
    }

    /// Jump to first result
    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last result
    pub fn select_last(&mut self) {
        self.selected = self.results.len().saturating_sub(1);
    }

    pub fn show_help(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn hide_help(&mut self) {
        self.mode = Mode::Search;
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Action::Quit,
            _ => {}
        }

        if self.mode == Mode::Help {
            // Any key closes help
            self.hide_help();
            return Action::Continue;
        }

        // Handle pending 'g' key for gg command
        if self.pending_key.take() == Some('g') && key.code == KeyCode::Char('g') {
            self.select_first();
            return Action::Continue;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('j'))
            | (KeyModifiers::CONTROL, KeyCode::Char('n')) => self.select_next(),
            (KeyModifiers::CONTROL, KeyCode::Char('k'))
            | (KeyModifiers::CONTROL, KeyCode::Char('p')) => self.select_prev(),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) => self.select_page_down(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.select_page_up(),
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => self.delete_word(),
            (KeyModifiers::CONTROL, KeyCode::Char('h')) => self.pop_char(),
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => self.select_first(),
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => self.select_last(),
            (KeyModifiers::CONTROL, KeyCode::Char('g')) => self.pending_key = Some('g'),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => self.remove_selected(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => {
                    if self.query.is_empty() {
                        return Action::Quit;
                    }
                    self.clear_query();
                }
                KeyCode::Enter => {
                    if let Some(name) = self.selected_name() {
                        return Action::Pick(name.to_string());
                    }
                }
                KeyCode::Down | KeyCode::Tab => self.select_next(),
                KeyCode::Up | KeyCode::BackTab => self.select_prev(),
                KeyCode::PageDown => self.select_page_down(),
                KeyCode::PageUp => self.select_page_up(),
                KeyCode::Home => self.select_first(),
                KeyCode::End => self.select_last(),
                KeyCode::F(1) => self.show_help(),
                KeyCode::Char(c) => self.push_char(c),
                KeyCode::Backspace => self.pop_char(),
                _ => {}
            },
            _ => {}
        }

        Action::Continue
    }
}
