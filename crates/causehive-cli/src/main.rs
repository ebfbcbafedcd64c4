#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use causehive_core::config::resolve_config;
use clap::{Args, CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hive: browse, filter, and search CauseHive causes",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Config file to use instead of the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Read causes from a JSON file instead of the API.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// API page to fetch.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Browse",
        about = "List causes",
        long_about = "Filter and sort causes from the API or a JSON file.",
        after_help = "EXAMPLES:\n    # Live education causes, most funded first\n    hive list --category education --status live --sort progress-high\n\n    # Causes from a saved API response\n    hive list --file causes.json --min-target 500 --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Search",
        about = "Suggest searches for a partial query",
        after_help = "EXAMPLES:\n    # Ask the API\n    hive suggest wat\n\n    # Use the built-in category list\n    hive suggest dev --offline"
    )]
    Suggest(cmd::suggest::SuggestArgs),

    #[command(
        next_help_heading = "Search",
        about = "Interactive search",
        long_about = "Search causes interactively with live suggestions and recent searches."
    )]
    Search(SearchArgs),

    #[command(
        next_help_heading = "Search",
        about = "Show or edit recent searches",
        after_help = "EXAMPLES:\n    hive history\n    hive history add \"clean water\"\n    hive history clear"
    )]
    History(cmd::history::HistoryArgs),

    #[command(
        next_help_heading = "Browse",
        about = "Show or edit saved causes",
        after_help = "EXAMPLES:\n    hive saved\n    hive saved toggle 42"
    )]
    Saved(cmd::saved::SavedArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    hive completions zsh > ~/.zfunc/_hive"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CAUSEHIVE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "causehive=debug,info"
        } else {
            "causehive=info,warn"
        })
    });

    let format = env::var("CAUSEHIVE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let result = run(&cli, output);
    if let Err(err) = result {
        tracing::debug!("command failed: {err:?}");
        render_error(output, &CliError::from(&err))?;
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let config = resolve_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::List(args) => cmd::list::run_list(args, output, &config),
        Commands::Suggest(args) => cmd::suggest::run_suggest(args, output, &config),
        Commands::Search(args) => {
            let causes = cmd::load_causes(&config, args.file.as_deref(), args.page)?;
            let store = cmd::open_store(&config)?;
            tui::run_search_tui(&config, store, causes)
        }
        Commands::History(args) => cmd::history::run_history(args, output, &config),
        Commands::Saved(args) => cmd::saved::run_saved(args, output, &config),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmd::history::HistoryCommand;
    use cmd::saved::SavedCommand;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["hive", "--json", "history"]);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["hive", "saved", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["hive", "list", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["hive", "history", "--config", "/tmp/hive.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/hive.toml")));
    }

    #[test]
    fn history_subcommands_parse() {
        let cli = Cli::parse_from(["hive", "history", "add", "clean water"]);
        let Commands::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(
            args.command,
            Some(HistoryCommand::Add {
                term: "clean water".to_string()
            })
        );

        let cli = Cli::parse_from(["hive", "history"]);
        assert!(matches!(cli.command, Commands::History(ref a) if a.command.is_none()));
    }

    #[test]
    fn saved_subcommands_parse() {
        let cli = Cli::parse_from(["hive", "saved", "toggle", "42"]);
        let Commands::Saved(args) = cli.command else {
            panic!("expected saved");
        };
        assert_eq!(args.command, Some(SavedCommand::Toggle { id: "42".to_string() }));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["hive", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["hive", "list"],
            vec!["hive", "list", "--category", "health", "--category", "education"],
            vec!["hive", "suggest", "wat"],
            vec!["hive", "search", "--file", "causes.json"],
            vec!["hive", "history", "clear"],
            vec!["hive", "saved", "add", "7"],
            vec!["hive", "completions", "zsh"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "failed to parse {args:?}: {:?}", result.err());
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
