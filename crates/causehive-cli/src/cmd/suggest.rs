//! `hive suggest`: one-shot search suggestions.

use crate::output::{OutputMode, Renderable, render_list};
use anyhow::Result;
use causehive_core::config::ClientConfig;
use causehive_search::suggest::fallback_suggestions;
use causehive_search::{ApiClient, FallbackSource, Suggestion, SuggestionSource};
use clap::Args;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial query.
    pub query: String,

    /// Maximum suggestions; defaults to `[search] max_suggestions`.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Skip the API and answer from the built-in category list.
    #[arg(long)]
    pub offline: bool,
}

struct SuggestionRow(Suggestion);

impl Renderable for SuggestionRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let s = &self.0;
        writeln!(w, "[{}] {}", s.kind.as_str(), s.query_text())?;
        if !s.description.is_empty() {
            writeln!(w, "    {}", s.description)?;
        }
        if let Some(url) = &s.url {
            writeln!(w, "    {url}")?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, &self.0)?;
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let s = &self.0;
        writeln!(
            w,
            "{}\t{}\t{}",
            s.kind.as_str(),
            s.query_text(),
            s.url.as_deref().unwrap_or("-")
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["type", "title", "url"]
    }
}

pub fn run_suggest(args: &SuggestArgs, output: OutputMode, config: &ClientConfig) -> Result<()> {
    let limit = args.limit.unwrap_or(config.search.max_suggestions);
    let query = args.query.trim();

    let suggestions = if query.chars().count() < config.search.min_query_len {
        tracing::debug!(query, "query too short for suggestions");
        Vec::new()
    } else if args.offline {
        let mut found = fallback_suggestions(query);
        found.truncate(limit);
        found
    } else {
        FallbackSource::new(ApiClient::new(&config.api)).suggest(query, limit)?
    };

    let rows: Vec<SuggestionRow> = suggestions.into_iter().map(SuggestionRow).collect();
    if rows.is_empty() && !output.is_json() {
        writeln!(io::stdout(), "No suggestions found")?;
        return Ok(());
    }
    render_list(&rows, output)?;
    Ok(())
}
