mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chargemap-cli")]
#[command(about = "Inspect and normalize Open Charge Map exports")]
struct Cli {
    /// OCM export to read (defaults to CHARGEMAP_DATA_PATH)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the normalized location list as JSON
    Normalize {
        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },
    /// Print import statistics and facet summaries
    Stats,
    /// Run a location query and print the matches as JSON
    Query {
        /// Exact city name, case-insensitive
        #[arg(long)]
        city: Option<String>,
        /// Minimum connector power in kW
        #[arg(long)]
        min_power_kw: Option<i32>,
        /// Operator name substring, case-insensitive
        #[arg(long)]
        operator: Option<String>,
        /// Keep locations without a power rating when filtering by power
        #[arg(long)]
        include_unknown: bool,
        /// Maximum number of locations to print
        #[arg(long, default_value_t = chargemap_core::DEFAULT_LIMIT)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = chargemap_core::load_cli_config();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let input = cli.input.unwrap_or(config.data_path);

    match cli.command {
        Commands::Normalize { output } => commands::run_normalize(&input, &output),
        Commands::Stats => commands::run_stats(&input),
        Commands::Query {
            city,
            min_power_kw,
            operator,
            include_unknown,
            limit,
        } => commands::run_query(
            &input,
            &chargemap_core::LocationFilter {
                city,
                min_power_kw,
                operator,
                include_unknown,
                limit,
            },
        ),
    }
}
