//! # gitnest UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Console messages for the operator. Output is advisory only; the point is
//! that informational, success, warning, and failure lines are easy to tell
//! apart. Each kind gets its own prefix and color (via `colored`); coloring is
//! dropped automatically when `NO_COLOR` is set or output is not a terminal.
//!
//! Progress and success go to stdout, warnings and failures to stderr.
//!
//! ```rust
//! ui::info("Extracting nested VCS metadata...");
//! ui::success("Parked 3 entries in .gitnest-archive.tar.gz");
//! ui::warning("Could not remove staging area; delete it manually.");
//! ui::failure("Archive already exists.");
//! ```
//!
use crate::core::report::{Outcome, PhaseReport};
use colored::Colorize;
use std::fmt::Display;

/// Informational progress line.
pub fn info(message: impl Display) {
    println!("{} {}", "info:".cyan().bold(), message);
}

/// Completed step or operation.
pub fn success(message: impl Display) {
    println!("{} {}", "done:".green().bold(), message);
}

/// Recovered problem the operator should look at.
pub fn warning(message: impl Display) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

/// Fatal problem; the run stops.
pub fn failure(message: impl Display) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Prints one line per item of a phase report, then its failures.
pub fn print_report(report: &PhaseReport) {
    for (path, outcome) in &report.outcomes {
        match outcome {
            Outcome::Moved => info(format!("{}: moved {}", report.phase, path.display())),
            Outcome::Created => info(format!(
                "{}: created directory {}",
                report.phase,
                path.display()
            )),
            Outcome::Removed => info(format!("{}: removed {}", report.phase, path.display())),
            // Nothing happened to these; only visible in the logs.
            Outcome::Covered { .. } | Outcome::Kept => {}
        }
    }
    for failed in &report.failures {
        warning(format!("{} failed for {}", report.phase, failed));
    }
}
