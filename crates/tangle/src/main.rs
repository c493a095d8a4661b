//! Tangle CLI - Dependency cycle analysis from the command line.
//!
//! Tangle reads a dependency graph (JSON or DSM text), finds its cycles and
//! the cheapest dependencies to cut, and prints the result as a list or a
//! Design Structure Matrix.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Tangle: dependency cycle analysis.
#[derive(Parser)]
#[command(name = "tangle")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to tangle.yaml in the current directory, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    bounds: cli::SolverArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List dependency cycles and the dependencies to cut
    Cycles {
        /// Graph file (.json, or DSM text)
        file: PathBuf,

        /// Maximum number of cycles to list
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the dependency structure matrix
    Dsm {
        /// Graph file (.json, or DSM text)
        file: PathBuf,

        /// Comma-separated vertex order to apply
        #[arg(short, long, value_delimiter = ',')]
        order: Vec<String>,

        /// Omit the column header line
        #[arg(long)]
        no_headers: bool,

        /// Sort the matrix so that every kept dependency points one way
        #[arg(short, long)]
        sort: bool,
    },

    /// Export the sorted matrix as JSON
    Export {
        /// Graph file (.json, or DSM text)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = cli::resolve_config(cli.config.as_deref(), &cli.bounds).and_then(|config| {
        match cli.command {
            Commands::Cycles { file, limit } => cli::cycles::run(&file, &config, limit),
            Commands::Dsm {
                file,
                order,
                no_headers,
                sort,
            } => cli::dsm::run(&file, &config, &order, !no_headers, sort),
            Commands::Export { file } => cli::export::run(&file, &config),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
