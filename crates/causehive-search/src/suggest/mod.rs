//! Search suggestions.
//!
//! A [`SuggestionSource`] turns a partial query into a short list of
//! [`Suggestion`]s. [`http::ApiClient`] asks the CauseHive API;
//! [`FallbackSource`] wraps any source and answers from a fixed list of
//! common categories when it fails.

pub mod http;

use causehive_core::error::ErrorCode;
use serde::{Deserialize, Serialize};

/// Categories offered when the API cannot be reached.
pub const COMMON_SEARCHES: [&str; 12] = [
    "education",
    "healthcare",
    "environment",
    "poverty relief",
    "disaster relief",
    "community development",
    "youth development",
    "women empowerment",
    "agriculture",
    "water and sanitation",
    "technology",
    "arts and culture",
];

/// Most fallback suggestions returned for one query.
pub const FALLBACK_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Cause,
    Category,
    History,
}

impl SuggestionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cause => "cause",
            Self::Category => "category",
            Self::History => "history",
        }
    }
}

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Search text when it differs from the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Suggestion {
    /// A past query shown under "Recent searches".
    #[must_use]
    pub fn history(term: &str) -> Self {
        Self {
            kind: SuggestionKind::History,
            title: String::new(),
            description: String::new(),
            id: None,
            url: None,
            text: Some(term.to_string()),
        }
    }

    /// Text placed in the search box when this entry is chosen.
    #[must_use]
    pub fn query_text(&self) -> &str {
        if self.title.is_empty() {
            self.text.as_deref().unwrap_or_default()
        } else {
            &self.title
        }
    }
}

/// Errors from the CauseHive HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl SuggestError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Transport { .. } | Self::Status { .. } => ErrorCode::SuggestionFetchFailed,
            Self::Decode { .. } => ErrorCode::SuggestionDecodeFailed,
        }
    }
}

/// Anything that can answer a partial query with suggestions.
pub trait SuggestionSource {
    /// Suggestions for `query`, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError`] when the backing service fails.
    fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SuggestError>;
}

impl<S: SuggestionSource + ?Sized> SuggestionSource for Box<S> {
    fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SuggestError> {
        (**self).suggest(query, limit)
    }
}

/// Common categories containing `query`, case-insensitively.
#[must_use]
pub fn fallback_suggestions(query: &str) -> Vec<Suggestion> {
    let needle = query.to_lowercase();
    COMMON_SEARCHES
        .iter()
        .filter(|term| term.contains(needle.as_str()))
        .take(FALLBACK_LIMIT)
        .map(|term| Suggestion {
            kind: SuggestionKind::Category,
            title: capitalize(term),
            description: format!("Search for {term} related causes"),
            id: None,
            url: None,
            text: Some((*term).to_string()),
        })
        .collect()
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Source that never fails: errors from `inner` are logged and answered
/// with [`fallback_suggestions`].
#[derive(Debug, Clone)]
pub struct FallbackSource<S> {
    inner: S,
}

impl<S> FallbackSource<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SuggestionSource> SuggestionSource for FallbackSource<S> {
    fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SuggestError> {
        match self.inner.suggest(query, limit) {
            Ok(suggestions) => Ok(suggestions),
            Err(err) => {
                tracing::warn!(code = %err.code(), "error fetching search suggestions: {err}");
                let mut fallback = fallback_suggestions(query);
                fallback.truncate(limit);
                Ok(fallback)
            }
        }
    }
}
