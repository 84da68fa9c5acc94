//! # gitnest In Command
//!
//! File: cli/src/commands/restore.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `gitnest in`: unpacks `.gitnest-archive.tar.gz` and puts every
//! parked entry back at its original path below the current directory, then
//! removes the archive.
//!
//! Existing files at a destination are replaced; existing directories are
//! kept as they are. If any item cannot be restored the archive is kept and
//! the command fails, so it can simply be run again once the cause is fixed.
//!
use crate::common::ui;
use crate::core::archiver;
use crate::core::config::NestConfig;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// Arguments for `gitnest in` (none).
#[derive(Parser, Debug)]
pub struct InArgs {}

/// # Handle In Command (`handle_in`)
///
/// Runs the restore direction against the current directory. Cleanup
/// problems after a successful restore are reported as warnings.
pub fn handle_in(_args: InArgs) -> Result<()> {
    let cfg = NestConfig::from_current_dir()?;
    info!("Handling in command in {}", cfg.root().display());
    ui::info(format!("Restoring VCS metadata from {}", cfg.archive_file_name()));

    let restoration = archiver::restore(&cfg)?;
    ui::print_report(&restoration.restore);
    ui::print_report(&restoration.cleanup);

    for failed in &restoration.cleanup.failures {
        ui::warning(format!(
            "Remove '{}' manually to complete the cleanup.",
            failed.path.display()
        ));
    }
    ui::success(format!(
        "Restored {} item(s) from {}.",
        restoration.restore.moved(),
        cfg.archive_file_name()
    ));
    Ok(())
}
