//! # cayley CLI entry point
//!
//! Parses command-line arguments, builds the instance registry from the
//! optional configuration file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cayley_cli::blades::{run_blades, BladesArgs};
use cayley_cli::config::CliConfig;
use cayley_cli::persist::{run_persist, PersistArgs};
use cayley_cli::product::{run_multiply, run_table, MultiplyArgs, TableArgs};

/// Cayley tables for diagonal-metric geometric algebras.
///
/// Enumerates blades, prints product tables, multiplies coefficient vectors,
/// and emits persisted table references.
#[derive(Parser, Debug)]
#[command(name = "cayley", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the blades of an N-generator algebra in dense index order.
    Blades(BladesArgs),

    /// Print the nonzero coefficients of a product table.
    Table(TableArgs),

    /// Multiply two coefficient vectors.
    Multiply(MultiplyArgs),

    /// Print the persisted reference and stable digest of a product table.
    Persist(PersistArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("cayley CLI starting");

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    let registry = config.registry();

    let result = match cli.command {
        Commands::Blades(args) => run_blades(&args),
        Commands::Table(args) => run_table(&args, &registry),
        Commands::Multiply(args) => run_multiply(&args, &registry),
        Commands::Persist(args) => run_persist(&args, &registry),
    };

    tracing::debug!(stats = ?registry.stats(), "registry at exit");

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
