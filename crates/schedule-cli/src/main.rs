//! `schedule` CLI - resolve recurring event definitions from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve a JSON array of event definitions for March (stdin → stdout)
//! schedule resolve --from 2025-03-01 --to 2025-03-31 < events.json
//!
//! # Only English-language primary services, written to a file
//! schedule resolve -i events.json -o march.json --services --language en \
//!   --from 2025-03-01 --to 2025-03-31
//!
//! # Window and filter defaults from a config file
//! schedule --config schedule.json resolve -i events.json
//!
//! # Expand a single recurrence into start instants
//! schedule expand -i recurrence.json --from 2025-03-01 --to 2025-06-30
//!
//! # Show how a repeat period is interpreted
//! schedule period P2W
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::{ArgAction, Args, Parser, Subcommand};
use schedule_engine::{
    generate, parse_period, resolve, resolve_primary_services, EventDefinition,
    RecurrenceDefinition, RepeatPeriod,
};
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, Overrides};

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Resolve recurring event schedules into concrete occurrences"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file with default window and filter settings
    #[arg(long, global = true, env = "SCHEDULE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
struct WindowArgs {
    /// Window start (RFC 3339 instant or YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Window end, inclusive (RFC 3339 instant or YYYY-MM-DD for the whole day)
    #[arg(long)]
    to: Option<String>,
    /// Maximum instances generated per recurring definition
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Category tag to include (repeatable)
    #[arg(long = "category", value_name = "TAG")]
    categories: Vec<String>,
    /// Language tag to include (repeatable)
    #[arg(long = "language", value_name = "TAG")]
    languages: Vec<String>,
    /// Keep definitions without a category when filtering by category
    #[arg(long)]
    include_uncategorized: bool,
    /// Keep definitions without languages when filtering by language
    #[arg(long)]
    include_language_unset: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve event definitions into a sorted list of instances
    Resolve {
        /// Input JSON file with an array of event definitions (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Restrict to primary services, always including uncategorized definitions
        #[arg(long)]
        services: bool,
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Expand one recurrence definition into start instants, one per line
    Expand {
        /// Input JSON file with a recurrence definition (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Show how a repeat period string is interpreted
    Period {
        /// ISO-8601 date duration, e.g. P2W
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Resolve {
            input,
            output,
            services,
            window,
            filter,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let overrides = collect_overrides(window, Some(filter));
            let window = config.window(&overrides)?;
            let criteria = config.criteria(&overrides);

            let json = read_input(input.as_deref())?;
            let definitions = parse_definitions(&json)?;

            let instances = if services {
                resolve_primary_services(&definitions, &window, &criteria)
            } else {
                resolve(&definitions, &window, &criteria)
            };

            let mut rendered = serde_json::to_string_pretty(&instances)
                .context("Failed to serialize resolved instances")?;
            rendered.push('\n');
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Expand { input, window } => {
            let config = load_config(cli.config.as_deref())?;
            let window = config.window(&collect_overrides(window, None))?;

            let json = read_input(input.as_deref())?;
            let recurrence: RecurrenceDefinition =
                serde_json::from_str(&json).context("Failed to parse recurrence definition")?;

            for instant in generate(&recurrence, &window) {
                println!("{}", instant.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
        }
        Commands::Period { value } => match value.parse::<RepeatPeriod>() {
            Ok(period) => println!("{}", period),
            Err(_) => println!("{} (fallback for unreadable '{}')", parse_period(&value), value),
        },
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn collect_overrides(window: WindowArgs, filter: Option<FilterArgs>) -> Overrides {
    let filter = filter.unwrap_or_default();
    Overrides {
        from: window.from,
        to: window.to,
        limit: window.limit,
        categories: filter.categories,
        languages: filter.languages,
        include_uncategorized: filter.include_uncategorized,
        include_language_unset: filter.include_language_unset,
    }
}

/// Parse a JSON array of event definitions.
///
/// Entries that do not form a valid definition are skipped with a warning so
/// one bad record does not sink the batch.
fn parse_definitions(json: &str) -> Result<Vec<EventDefinition>> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(json).context("Input must be a JSON array of event definitions")?;
    let total = entries.len();

    let definitions: Vec<EventDefinition> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(definition) => Some(definition),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping invalid event definition");
                None
            }
        })
        .collect();

    tracing::debug!(total, valid = definitions.len(), "parsed event definitions");
    Ok(definitions)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
