//! # gitnest Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! gitnest parks the VCS metadata of repositories nested inside a working
//! tree (`sub/.git`, `sub/.gitignore`, ...) in a sidecar archive, so the tree
//! can be shipped or walked without the nested repositories showing up, and
//! puts it back later.
//!
//! This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the `out` / `in` handlers
//! - Mapping errors to exit codes
//!
//! ## Examples
//!
//! ```bash
//! gitnest out      # move nested metadata into .gitnest-archive.tar.gz
//! gitnest in       # restore it and remove the archive
//! gitnest -vv out  # same, with debug logging on stderr
//! ```
//!
//! Exit codes: `0` success or nothing to do, `1` failed step, `2` usage
//! error, `3` archive or staging area in the wrong state.
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // `out` and `in` handlers
mod common; // Shared utilities (archive, fs, ui)
mod core; // Config, errors, guard, selector, archiver

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "gitnest",
    about = "Park nested VCS metadata in a sidecar archive and restore it later",
    long_about = "Moves .git directories and .gitignore/.gitattributes/.gitmodules/.gitkeep files found in\n\
                  subdirectories of the current directory into .gitnest-archive.tar.gz ('out'), and puts them\n\
                  back ('in'). Metadata directly in the current directory is never touched.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// The two mutually exclusive modes.
#[derive(Parser, Debug)]
enum Commands {
    /// Extract nested VCS metadata into the archive.
    Out(commands::out::OutArgs),
    /// Restore VCS metadata from the archive.
    In(commands::restore::InArgs),
}

fn main() {
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

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Out(args) => commands::out::handle_out(args),
        Commands::In(args) => commands::restore::handle_in(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        common::ui::failure(format!("{:#}", e));
        std::process::exit(crate::core::error::exit_code_for(&e));
    }
}
