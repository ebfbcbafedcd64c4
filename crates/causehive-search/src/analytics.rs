//! Search analytics.
//!
//! The search box reports two events: a search was executed, and a
//! suggestion was chosen. [`SessionAnalytics`] aggregates them in memory
//! for the running session; [`TracingAnalytics`] only logs them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Searches kept in the session log.
pub const SEARCH_LOG_LIMIT: usize = 100;
/// Distinct recent queries kept.
pub const RECENT_LIMIT: usize = 10;

/// Receiver of search-box events.
pub trait SearchAnalytics {
    fn track_search(&mut self, query: &str);
    fn track_suggestion_click(&mut self, suggestion: &str, query: &str);
}

impl<A: SearchAnalytics + ?Sized> SearchAnalytics for Box<A> {
    fn track_search(&mut self, query: &str) {
        (**self).track_search(query);
    }

    fn track_suggestion_click(&mut self, suggestion: &str, query: &str) {
        (**self).track_suggestion_click(suggestion, query);
    }
}

/// Logs events at info level and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl SearchAnalytics for TracingAnalytics {
    fn track_search(&mut self, query: &str) {
        tracing::info!(target: "causehive::analytics", query, "search executed");
    }

    fn track_suggestion_click(&mut self, suggestion: &str, query: &str) {
        tracing::info!(target: "causehive::analytics", suggestion, query, "suggestion selected");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRecord {
    pub query: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularSearch {
    pub query: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionAnalytics {
    searches: Vec<SearchRecord>,
    recent: Vec<String>,
    total_searches: usize,
    total_clicks: usize,
}

impl SessionAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged searches, newest first.
    #[must_use]
    pub fn searches(&self) -> &[SearchRecord] {
        &self.searches
    }

    #[must_use]
    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    #[must_use]
    pub const fn total_searches(&self) -> usize {
        self.total_searches
    }

    #[must_use]
    pub const fn total_clicks(&self) -> usize {
        self.total_clicks
    }

    /// Most frequent logged queries, lower-cased and trimmed.
    ///
    /// Single-character queries are ignored. Ties keep first-seen order.
    #[must_use]
    pub fn popular_searches(&self, limit: usize) -> Vec<PopularSearch> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in &self.searches {
            let query = record.query.trim().to_lowercase();
            if query.chars().count() <= 1 {
                continue;
            }
            let count = counts.entry(query.clone()).or_insert(0);
            if *count == 0 {
                order.push(query);
            }
            *count += 1;
        }

        let mut popular: Vec<PopularSearch> = order
            .into_iter()
            .map(|query| {
                let count = counts.get(&query).copied().unwrap_or_default();
                PopularSearch { query, count }
            })
            .collect();
        popular.sort_by(|a, b| b.count.cmp(&a.count));
        popular.truncate(limit);
        popular
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn record_search(&mut self, query: &str, at: DateTime<Utc>) {
        self.searches.insert(
            0,
            SearchRecord {
                query: query.to_string(),
                at,
            },
        );
        self.searches.truncate(SEARCH_LOG_LIMIT);

        self.recent.retain(|existing| existing != query);
        self.recent.insert(0, query.to_string());
        self.recent.truncate(RECENT_LIMIT);

        self.total_searches += 1;
    }
}

impl SearchAnalytics for SessionAnalytics {
    fn track_search(&mut self, query: &str) {
        self.record_search(query, Utc::now());
    }

    fn track_suggestion_click(&mut self, suggestion: &str, query: &str) {
        tracing::trace!(suggestion, query, "suggestion click recorded");
        self.total_clicks += 1;
    }
}
