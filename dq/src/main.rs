//! dq: Discover Query - CLI for inspecting discover query state.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dq")]
#[command(about = "Discover Query - inspect fields, search queries and API payloads")]
#[command(version)]
struct Cli {
    /// Configuration directory (overrides DISCOVER_ROOT)
    #[arg(long = "config-root", value_name = "DIR", global = true)]
    config_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how field expressions are parsed
    #[command(visible_alias = "f")]
    Field {
        /// Field expressions (e.g., title, count(), p95(transaction.duration),
        /// equation|count() * 2)
        #[arg(required = true)]
        fields: Vec<String>,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// Tokenize a search query, optionally editing its filters
    #[command(visible_alias = "s")]
    Search {
        /// Search query (e.g., 'browser.name:chrome is:unresolved')
        query: String,

        /// Remove every filter on KEY
        #[arg(short = 'r', long = "remove", value_name = "KEY")]
        remove: Vec<String>,

        /// Replace the filters on KEY with VALUE
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// Build the events API payload for URL parameters
    #[command(visible_alias = "p")]
    Payload {
        /// URL query string (e.g., 'field=title&field=count()&sort=-count')
        query_string: Option<String>,

        /// Extra URL parameter, repeatable
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Print the facets payload instead
        #[arg(long = "facets", conflicts_with = "metrics")]
        facets: bool,

        /// Print the metrics payload instead
        #[arg(long = "metrics")]
        metrics: bool,

        /// Row limit for the metrics payload
        #[arg(short = 'l', long = "limit", requires = "metrics")]
        limit: Option<u32>,
    },

    /// Build the events API payload for a saved query file
    Saved {
        /// Saved query JSON file
        file: PathBuf,

        /// URL parameter supplying missing project, environment or window
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Convert a value between units (e.g., 2 second millisecond)
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },

    /// Format a date with the configured display preferences
    Date {
        /// Date or datetime (e.g., 2024-03-05T15:04:09Z)
        value: String,
    },

    /// Scale a column of a result table JSON file into another unit
    Scale {
        /// Table JSON file with `data` and `meta`
        file: PathBuf,

        /// Column alias to scale
        column: String,

        /// Target unit (e.g., second, kibibyte, 1/minute)
        unit: String,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(cli.config_root.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.log_level);

    let result = match cli.command {
        Commands::Field { fields, format } => commands::field(&fields, &format),
        Commands::Search { query, remove, set, format } => {
            commands::search(&query, &remove, &set, &format)
        }
        Commands::Payload { query_string, params, facets, metrics, limit } => {
            let kind = if facets {
                commands::PayloadKind::Facets
            } else if metrics {
                commands::PayloadKind::Metrics { limit }
            } else {
                commands::PayloadKind::Events
            };
            commands::payload(&config, query_string.as_deref(), &params, kind)
        }
        Commands::Saved { file, params } => commands::saved(&config, &file, &params),
        Commands::Convert { value, from, to } => commands::convert(value, &from, &to),
        Commands::Date { value } => commands::date(&config, &value),
        Commands::Scale { file, column, unit } => commands::scale(&file, &column, &unit),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
