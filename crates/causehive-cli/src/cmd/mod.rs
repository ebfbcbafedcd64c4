pub mod completions;
pub mod history;
pub mod list;
pub mod saved;
pub mod suggest;

use anyhow::{Context, Result};
use causehive_core::config::ClientConfig;
use causehive_core::model::cause::{Cause, parse_causes};
use causehive_core::store::SqliteStore;
use causehive_search::ApiClient;
use std::path::Path;

/// Open the local store named by `[storage] path`.
pub fn open_store(config: &ClientConfig) -> Result<SqliteStore> {
    let path = config.storage.resolved_path();
    SqliteStore::open(&path)
        .with_context(|| format!("failed to open local storage at {}", path.display()))
}

/// Causes from a JSON file, or one page of the API listing.
pub fn load_causes(config: &ClientConfig, file: Option<&Path>, page: u32) -> Result<Vec<Cause>> {
    if let Some(path) = file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return parse_causes(&json).with_context(|| format!("invalid causes in {}", path.display()));
    }

    let client = ApiClient::new(&config.api);
    let causes = client
        .fetch_causes(page)
        .with_context(|| format!("failed to fetch causes from {}", client.base_url()))?;
    tracing::debug!(page, count = causes.len(), "fetched cause page");
    Ok(causes)
}
