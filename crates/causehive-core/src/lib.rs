#![forbid(unsafe_code)]
//! causehive-core library.
//!
//! Canonical cause records, the filter/sort/summary pipeline that drives the
//! cause list, and the local key-value storage used for search history and
//! saved causes.
//!
//! # Conventions
//!
//! - **Errors**: module errors are `thiserror` enums; loaders return `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Purity**: nothing under [`filter`] mutates its inputs.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod saved;
pub mod store;

pub use filter::sort::{SortKey, sort_causes, sort_causes_by_tag};
pub use filter::summary::{active_filter_count, filters_summary};
pub use filter::{CauseFilter, FilterInput, Selection, filter_causes};
pub use model::cause::{Cause, parse_causes};
