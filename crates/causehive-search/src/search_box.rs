//! Debounced search box.
//!
//! [`SearchBox`] holds the state behind a search input with a suggestion
//! dropdown. It performs no I/O of its own beyond history storage: the
//! caller feeds it keystrokes and clock readings, runs the
//! [`FetchRequest`]s it emits against a suggestion source, and hands the
//! results back through [`SearchBox::resolve`].
//!
//! Each fetch carries a generation number. With
//! `drop_stale_responses` enabled, only the response to the newest request
//! is applied; with it disabled, responses are applied in arrival order and
//! a slow reply for an older query can replace fresher results.

use crate::analytics::SearchAnalytics;
use crate::history::SearchHistory;
use crate::suggest::{SuggestError, Suggestion};
use causehive_core::config::SearchConfig;
use causehive_core::store::KvStore;
use std::time::Instant;

/// Ask for suggestions for `query`; answer with [`SearchBox::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: String,
}

/// Outcome the host acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Run a search. `selected` is set when a dropdown entry was chosen.
    Search {
        query: String,
        selected: Option<Suggestion>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// What the dropdown currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Closed,
    Loading,
    Suggestions,
    History,
    NoResults,
}

#[derive(Debug)]
pub struct SearchBox<S: KvStore, A: SearchAnalytics> {
    config: SearchConfig,
    history: SearchHistory<S>,
    analytics: A,
    query: String,
    debounced_query: String,
    last_keystroke: Option<Instant>,
    suggestions: Vec<Suggestion>,
    recent: Vec<String>,
    highlighted: Option<usize>,
    open: bool,
    focused: bool,
    loading: bool,
    generation: u64,
}

impl<S: KvStore, A: SearchAnalytics> SearchBox<S, A> {
    pub fn new(config: &SearchConfig, history: SearchHistory<S>, analytics: A) -> Self {
        let history =
            history.with_limits(config.history_limit, config.history_display_limit);
        let recent = history.load();
        Self {
            config: config.clone(),
            history,
            analytics,
            query: String::new(),
            debounced_query: String::new(),
            last_keystroke: None,
            suggestions: Vec::new(),
            recent,
            highlighted: None,
            open: false,
            focused: false,
            loading: false,
            generation: 0,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Recent searches offered in the dropdown.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.recent
    }

    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn analytics(&self) -> &A {
        &self.analytics
    }

    /// Navigable entries: suggestions, then history.
    #[must_use]
    pub fn entries(&self) -> Vec<Suggestion> {
        self.suggestions
            .iter()
            .cloned()
            .chain(self.recent.iter().map(|term| Suggestion::history(term)))
            .collect()
    }

    fn entry_count(&self) -> usize {
        self.suggestions.len() + self.recent.len()
    }

    fn short_query(&self) -> bool {
        self.query.trim().chars().count() < self.config.min_query_len
    }

    #[must_use]
    pub fn display(&self) -> Dropdown {
        if !self.open {
            Dropdown::Closed
        } else if self.loading {
            Dropdown::Loading
        } else if !self.suggestions.is_empty() {
            Dropdown::Suggestions
        } else if !self.recent.is_empty() && self.short_query() {
            Dropdown::History
        } else if self.recent.is_empty() && !self.short_query() {
            Dropdown::NoResults
        } else {
            Dropdown::Closed
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.open = true;
    }

    /// Replace the buffer and restart the debounce timer.
    pub fn input(&mut self, text: &str, now: Instant) {
        self.query = text.to_string();
        self.highlighted = None;
        self.focused = true;
        self.last_keystroke = Some(now);
        if self.query.trim().is_empty() {
            self.open = false;
            self.suggestions.clear();
        } else {
            self.open = true;
        }
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut text = std::mem::take(&mut self.query);
        text.push(c);
        self.input(&text, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let mut text = std::mem::take(&mut self.query);
        text.pop();
        self.input(&text, now);
    }

    /// Advance the debounce timer.
    ///
    /// Once the buffer has been still for the debounce interval and differs
    /// from the last settled value, a long enough query yields a fetch and a
    /// short one clears the suggestions.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        if self.query == self.debounced_query {
            return None;
        }
        let last = self.last_keystroke?;
        if now.saturating_duration_since(last) < self.config.debounce() {
            return None;
        }

        self.debounced_query.clone_from(&self.query);
        if self.short_query() {
            self.suggestions.clear();
            self.loading = false;
            // A fetch for the longer query may still be in flight.
            self.generation += 1;
            return None;
        }

        self.generation += 1;
        self.loading = true;
        tracing::debug!(generation = self.generation, query = %self.query, "requesting suggestions");
        Some(FetchRequest {
            generation: self.generation,
            query: self.debounced_query.clone(),
        })
    }

    /// Apply the outcome of a fetch. Returns whether it was applied.
    pub fn resolve(
        &mut self,
        generation: u64,
        result: Result<Vec<Suggestion>, SuggestError>,
    ) -> bool {
        if self.config.drop_stale_responses && generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "dropping stale suggestions");
            return false;
        }

        self.loading = false;
        match result {
            Ok(mut suggestions) => {
                suggestions.truncate(self.config.max_suggestions);
                self.suggestions = suggestions;
            }
            Err(err) => {
                tracing::warn!(code = %err.code(), "error fetching suggestions: {err}");
                self.suggestions.clear();
            }
        }
        if self.highlighted.is_some_and(|i| i >= self.entry_count()) {
            self.highlighted = None;
        }
        true
    }

    pub fn handle_key(&mut self, key: SearchKey) -> Option<SearchAction> {
        if !self.open {
            return None;
        }
        match key {
            SearchKey::Down => {
                self.select_next();
                None
            }
            SearchKey::Up => {
                self.select_prev();
                None
            }
            SearchKey::Enter => match self.highlighted {
                Some(index) if index < self.entry_count() => self.select(index),
                _ => self.submit(),
            },
            SearchKey::Escape => {
                self.open = false;
                self.highlighted = None;
                self.focused = false;
                None
            }
        }
    }

    fn select_next(&mut self) {
        let len = self.entry_count();
        if len == 0 {
            return;
        }
        let i = self.highlighted.map_or(0, |i| (i + 1) % len);
        self.highlighted = Some(i);
    }

    fn select_prev(&mut self) {
        let len = self.entry_count();
        if len == 0 {
            return;
        }
        let i = self
            .highlighted
            .map_or(len - 1, |i| if i == 0 { len - 1 } else { i - 1 });
        self.highlighted = Some(i);
    }

    /// Choose entry `index` of [`Self::entries`] and search for it.
    pub fn select(&mut self, index: usize) -> Option<SearchAction> {
        let entry = self.entries().into_iter().nth(index)?;
        let text = entry.query_text().to_string();
        self.analytics.track_suggestion_click(&text, &self.query);
        self.query.clone_from(&text);
        self.run_search(&text, Some(entry))
    }

    /// Search for the raw buffer.
    pub fn submit(&mut self) -> Option<SearchAction> {
        let text = self.query.clone();
        self.run_search(&text, None)
    }

    fn run_search(&mut self, text: &str, selected: Option<Suggestion>) -> Option<SearchAction> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        self.recent = self.history.save(query);
        self.analytics.track_search(query);
        self.open = false;
        self.highlighted = None;
        Some(SearchAction::Search {
            query: query.to_string(),
            selected,
        })
    }

    /// A pointer press; anything outside the box closes the dropdown.
    pub fn pointer_down(&mut self, inside: bool) {
        if !inside {
            self.open = false;
            self.highlighted = None;
        }
    }

    /// Empty the buffer, keeping focus.
    pub fn clear(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.open = false;
        self.highlighted = None;
        self.focused = true;
        self.loading = false;
        // Anything still in flight answers a query that no longer exists.
        self.generation += 1;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.recent.clear();
        if self.highlighted.is_some_and(|i| i >= self.entry_count()) {
            self.highlighted = None;
        }
    }
}
