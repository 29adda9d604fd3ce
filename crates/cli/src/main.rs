mod commands;
mod config;
mod input;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::input::Assignment;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SKU_LOG";

/// Product variant configurator and catalog rule engine.
#[derive(Parser)]
#[command(
    name = "sku",
    version,
    about = "Product variant configurator and catalog rule engine"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Merchandising config file (falls back to SKU_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the default selection for a product
    Default {
        /// Path to the product JSON file
        product: PathBuf,
    },

    /// Apply a facet change and resolve the best matching variant
    Resolve {
        /// Path to the product JSON file
        product: PathBuf,
        /// Current selection JSON file (defaults to the default selection)
        #[arg(long)]
        selection: Option<PathBuf>,
        /// Facet change as key=value
        #[arg(long = "set", value_name = "KEY=VALUE")]
        change: Assignment,
    },

    /// Find the variant matching a selection exactly
    Exact {
        /// Path to the product JSON file
        product: PathBuf,
        /// Selection JSON file
        #[arg(long)]
        selection: PathBuf,
    },

    /// List the facet values offered for a selection
    Options {
        /// Path to the product JSON file
        product: PathBuf,
        /// Selection JSON file (defaults to the default selection)
        #[arg(long)]
        selection: Option<PathBuf>,
    },

    /// Check whether a facet value is reachable from a selection
    Available {
        /// Path to the product JSON file
        product: PathBuf,
        /// Facet key
        #[arg(long)]
        key: String,
        /// Facet value
        #[arg(long)]
        value: String,
        /// Selection JSON file (defaults to the default selection)
        #[arg(long)]
        selection: Option<PathBuf>,
    },

    /// Filter a catalog with a rule set
    Filter {
        /// Path to the catalog JSON file
        catalog: PathBuf,
        /// Path to the rule-set JSON file
        #[arg(long)]
        rules: PathBuf,
    },

    /// Build the merchandising sections named in the config
    Sections {
        /// Path to the catalog JSON file
        catalog: PathBuf,
    },

    /// Count distinct values of a key across a catalog
    Facets {
        /// Path to the catalog JSON file
        catalog: PathBuf,
        /// Rule-style key (specs.<name> or a top-level property)
        #[arg(long)]
        key: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context {
        output: cli.output,
        quiet: cli.quiet,
        config: cli.config,
    };

    match cli.command {
        Commands::Default { product } => {
            commands::configure::cmd_default(&ctx, &product);
        }
        Commands::Resolve {
            product,
            selection,
            change,
        } => {
            commands::configure::cmd_resolve(&ctx, &product, selection.as_deref(), &change);
        }
        Commands::Exact { product, selection } => {
            commands::configure::cmd_exact(&ctx, &product, &selection);
        }
        Commands::Options { product, selection } => {
            commands::configure::cmd_options(&ctx, &product, selection.as_deref());
        }
        Commands::Available {
            product,
            key,
            value,
            selection,
        } => {
            commands::configure::cmd_available(&ctx, &product, &key, &value, selection.as_deref());
        }
        Commands::Filter { catalog, rules } => {
            commands::catalog::cmd_filter(&ctx, &catalog, &rules);
        }
        Commands::Sections { catalog } => {
            commands::catalog::cmd_sections(&ctx, &catalog);
        }
        Commands::Facets { catalog, key } => {
            commands::catalog::cmd_facets(&ctx, &catalog, &key);
        }
    }
}

/// Install the stderr log subscriber. `SKU_LOG` overrides `-v`.
fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbosity).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Report an error and exit with status 1.
pub(crate) fn fail(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}
