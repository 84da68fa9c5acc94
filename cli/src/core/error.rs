//! # gitnest Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout gitnest. Fatal
//! conditions that abort a run are variants of `NestError`; per-item problems
//! that a run recovers from are *not* errors here but `ItemFailure` records
//! collected in a `PhaseReport` (see `core::report`).
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `NestError`: A custom error enum using `thiserror` for the domain error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! `main` downcasts the final `anyhow::Error` to `NestError` to choose the
//! process exit code (`NestError::exit_code`).
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if config.archive_path().exists() {
//!     return Err(NestError::PreconditionViolation {
//!         path: config.archive_path(),
//!         reason: "archive already exists".into(),
//!     })?;
//! }
//!
//! // Add context to I/O errors using anyhow
//! fs::create_dir(&staging).with_context(|| format!("Failed to create {}", staging.display()))?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for unrecoverable step failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for archive / staging area state violations.
pub const EXIT_PRECONDITION: i32 = 3;

/// Fatal error kinds of an extract or restore run.
#[derive(Error, Debug)]
pub enum NestError {
    #[error("Precondition violated for '{path}': {reason}. Clean up manually before retrying.")]
    PreconditionViolation { path: PathBuf, reason: String },

    #[error("Failed to pack staging area '{staging}' into archive '{archive}': {source}")]
    ArchivePack {
        staging: PathBuf,
        archive: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to unpack archive '{archive}': {source}")]
    ArchiveExtract {
        archive: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("None of the {selected} selected metadata entries could be moved into the staging area.")]
    NothingRelocated { selected: usize },

    #[error("{failed} item(s) could not be restored; archive '{archive}' was kept. Fix the cause and run 'gitnest in' again.")]
    RestoreIncomplete { failed: usize, archive: PathBuf },
}

impl NestError {
    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            NestError::PreconditionViolation { .. } => EXIT_PRECONDITION,
            _ => EXIT_FAILURE,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

/// Maps any error bubbling out of a command to the process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<NestError>()
        .map_or(EXIT_FAILURE, NestError::exit_code)
}
