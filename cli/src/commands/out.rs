//! # gitnest Out Command
//!
//! File: cli/src/commands/out.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `gitnest out`: moves VCS metadata found in subdirectories of the
//! current directory into `.gitnest-archive.tar.gz`. The current directory's
//! own `.git`, `.gitignore`, etc. are left alone.
//!
//! ```bash
//! cd my-monorepo
//! gitnest out     # vendor/lib/.git, vendor/lib/.gitignore, ... -> archive
//! ```
//!
use crate::common::ui;
use crate::core::archiver::{self, Extraction};
use crate::core::config::NestConfig;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// Arguments for `gitnest out` (none).
#[derive(Parser, Debug)]
pub struct OutArgs {}

/// # Handle Out Command (`handle_out`)
///
/// Runs the extract direction against the current directory and prints a
/// summary. Per-item failures are printed as warnings and do not fail the
/// command; guard, pack, and "nothing could be moved" errors do.
pub fn handle_out(_args: OutArgs) -> Result<()> {
    let cfg = NestConfig::from_current_dir()?;
    info!("Handling out command in {}", cfg.root().display());
    ui::info(format!(
        "Extracting nested VCS metadata below {}",
        cfg.root().display()
    ));

    match archiver::extract(&cfg)? {
        Extraction::NothingToDo => {
            ui::success("No nested VCS metadata found; nothing to extract.");
        }
        Extraction::Parked {
            stage,
            members,
            cleanup,
        } => {
            ui::print_report(&stage);
            ui::print_report(&cleanup);
            if !cleanup.succeeded() {
                ui::warning(format!(
                    "Staging area '{}' could not be removed; delete it manually before the next run.",
                    cfg.staging_dir_name()
                ));
            }
            if !stage.succeeded() {
                ui::warning(format!(
                    "{} entr{} could not be moved and stayed in place.",
                    stage.failures.len(),
                    if stage.failures.len() == 1 { "y" } else { "ies" }
                ));
            }
            ui::success(format!(
                "Parked {} entr{} ({} archive members) in {}",
                stage.moved(),
                if stage.moved() == 1 { "y" } else { "ies" },
                members,
                cfg.archive_file_name()
            ));
        }
    }
    Ok(())
}
