#![forbid(unsafe_code)]
//! causehive-search library.
//!
//! The search box behind the cause list: a debounced suggestion client
//! ([`search_box::SearchBox`]), per-user search history, suggestion sources
//! backed by the CauseHive HTTP API, and search analytics.
//!
//! # Conventions
//!
//! - **Errors**: module errors are `thiserror` enums; suggestion and storage
//!   failures are logged and degrade to empty results.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Time**: nothing reads the clock itself; callers pass `Instant`s in.

pub mod analytics;
pub mod history;
pub mod search_box;
pub mod suggest;

pub use analytics::{SearchAnalytics, SessionAnalytics, TracingAnalytics};
pub use history::SearchHistory;
pub use search_box::{Dropdown, FetchRequest, SearchAction, SearchBox, SearchKey};
pub use suggest::http::ApiClient;
pub use suggest::{FallbackSource, SuggestError, Suggestion, SuggestionSource};
