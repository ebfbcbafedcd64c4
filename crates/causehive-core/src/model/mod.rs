//! Canonical data model shared by the filter, sort, and search layers.

pub mod cause;
