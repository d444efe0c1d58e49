//! # SevenRS Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! SevenRS is one step of a data pipeline: it takes pipeline items (JSON
//! records with base64 binary attachments), extracts or builds 7z archives by
//! driving an external 7z executable, and emits the resulting items.
//!
//! This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the `extract` or `compress` handler
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! sevenrs --help
//!
//! # Extract with debug logging (logs go to stderr, items to stdout)
//! sevenrs -vv extract --input items.json > out.json
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // extract / compress operations and the batch loop
mod common; // archiver, filesystem and process utilities
mod core; // configuration, errors, pipeline items

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "sevenrs",
    about = "SevenRS: extract and build 7z archives inside a data pipeline",
    long_about = "Reads pipeline items as JSON, extracts or compresses 7z archives through an\n\
                  external 7z executable, and writes the resulting items as JSON.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Extract files from the 7z archive carried by each item
    #[command(alias = "x")]
    Extract(commands::ExtractArgs),
    /// Create a 7z archive from fields of each item
    #[command(alias = "a")]
    Compress(commands::CompressArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Verbosity level: {}", cli.verbose);

    let command_result = match cli.command {
        Commands::Extract(args) => commands::handle_extract(args).await,
        Commands::Compress(args) => commands::handle_compress(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
