//! `hive history`: inspect and edit the search history.

use crate::output::{OutputMode, render};
use anyhow::Result;
use causehive_core::config::ClientConfig;
use causehive_search::SearchHistory;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Show recent searches (default).
    Show {
        /// Show every stored entry, not just the recent few.
        #[arg(long)]
        all: bool,
    },
    /// Record a search as if it had been submitted.
    Add { term: String },
    /// Forget all recent searches.
    Clear,
}

#[derive(Debug, Serialize)]
struct HistoryReport<'a> {
    key: &'a str,
    entries: Vec<String>,
}

pub fn run_history(args: &HistoryArgs, output: OutputMode, config: &ClientConfig) -> Result<()> {
    let store = super::open_store(config)?;
    let mut history = SearchHistory::new(store, config.user_id.as_deref()).with_limits(
        config.search.history_limit,
        config.search.history_display_limit,
    );

    let command = args
        .command
        .clone()
        .unwrap_or(HistoryCommand::Show { all: false });
    let entries = match command {
        HistoryCommand::Show { all: true } => history.stored(),
        HistoryCommand::Show { all: false } => history.load(),
        HistoryCommand::Add { term } => {
            let term = term.trim();
            if term.is_empty() {
                anyhow::bail!("search term is blank");
            }
            history.save(term)
        }
        HistoryCommand::Clear => {
            history.clear();
            tracing::info!(key = history.key(), "cleared search history");
            Vec::new()
        }
    };

    let report = HistoryReport {
        key: history.key(),
        entries,
    };
    render(output, &report, |report, w| {
        if report.entries.is_empty() {
            return writeln!(w, "No recent searches");
        }
        for entry in &report.entries {
            writeln!(w, "{entry}")?;
        }
        Ok(())
    })
}
