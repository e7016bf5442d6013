mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ecofactor",
    version,
    about = "Emission factor import and GHG emission calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import emission factors from a CSV file into a store
    Import {
        /// Path to a comma- or semicolon-separated factor file
        input_file: PathBuf,

        /// JSON store file (created if missing)
        #[arg(short, long, value_name = "FILE")]
        store: PathBuf,

        /// What to do with duplicates: skip (default), replace or keep-both
        #[arg(short, long)]
        policy: Option<String>,

        /// Report what would happen without writing the store
        #[arg(long)]
        dry_run: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Calculate emissions for a fuel consumption
    Calc {
        /// Fuel name or alias (e.g. "diesel", "Lenha")
        #[arg(short, long)]
        fuel: String,

        /// Consumed quantity; a decimal comma is accepted
        #[arg(short, long)]
        quantity: String,

        /// Unit of the quantity: kg, t, L, m3, ...
        #[arg(short, long)]
        unit: String,

        /// Sector the fuel is used in
        #[arg(long)]
        sector: Option<String>,

        /// Custom JSON fuel catalog (default: built-in)
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate fuel catalogs
    Fuels {
        #[command(subcommand)]
        action: FuelsAction,
    },
    /// Approve high-confidence factor candidates in concurrent groups
    Batch {
        /// JSON store file
        #[arg(short, long, value_name = "FILE")]
        store: PathBuf,

        /// Minimum confidence score
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,

        /// Records processed concurrently per group
        #[arg(long, default_value_t = 5)]
        batch_size: usize,

        /// Merge near-duplicates into existing custom records
        #[arg(long)]
        dedup: bool,

        /// Name similarity required for a merge
        #[arg(long, default_value_t = 0.9)]
        dedup_threshold: f64,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

#[derive(Subcommand)]
enum FuelsAction {
    /// List the fuels in a catalog
    List {
        /// Custom JSON fuel catalog (default: built-in)
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
    /// Validate a custom fuel catalog
    Validate {
        /// Path to JSON catalog file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            input_file,
            store,
            policy,
            dry_run,
            output,
        } => commands::import::run(&input_file, &store, policy.as_deref(), dry_run, &output).await,
        Commands::Calc {
            fuel,
            quantity,
            unit,
            sector,
            catalog,
            output,
        } => commands::calc::run(&fuel, &quantity, &unit, sector, catalog.as_deref(), &output),
        Commands::Fuels { action } => match action {
            FuelsAction::List { catalog } => commands::fuels::list(catalog.as_deref()),
            FuelsAction::Validate { file } => commands::fuels::validate(&file),
        },
        Commands::Batch {
            store,
            threshold,
            batch_size,
            dedup,
            dedup_threshold,
            output,
        } => {
            let options = commands::batch::options(threshold, batch_size, dedup, dedup_threshold);
            commands::batch::run(&store, options, &output).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
