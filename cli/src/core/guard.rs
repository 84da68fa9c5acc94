//! # gitnest Pre-flight Guard
//!
//! File: cli/src/core/guard.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Existence checks that run before either direction touches the filesystem.
//! They are the only automated defense against double application: the
//! archive's presence means metadata is currently parked, and a leftover
//! staging area means an earlier run did not finish.
//!
//! | Direction | Archive            | Staging area   |
//! |-----------|--------------------|----------------|
//! | `out`     | must not exist     | must not exist |
//! | `in`      | must exist (file)  | must not exist |
//!
//! Any violation is a `NestError::PreconditionViolation`.
//!
use crate::common::fs::io::entry_exists; // lstat-based existence, dangling links count
use crate::core::config::NestConfig; // Fixed names and derived paths
use crate::core::error::{NestError, Result}; // Domain error and crate Result
use tracing::debug; // Logging utilities

/// # Check Extract Preconditions (`check_extract`)
///
/// Checks that an extract run may start: neither the staging area nor the
/// archive may exist.
///
/// # Arguments
///
/// * `cfg` - The run configuration naming the working root.
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` if `gitnest out` may proceed.
///
/// # Errors
///
/// Returns `NestError::PreconditionViolation` if:
/// - A staging area is left over from an earlier run.
/// - Anything exists at the archive path.
pub fn check_extract(cfg: &NestConfig) -> Result<()> {
    check_no_staging(cfg)?;
    let archive = cfg.archive_path();
    if entry_exists(&archive) {
        return Err(NestError::PreconditionViolation {
            path: archive,
            reason: "archive already exists; metadata appears to be extracted already \
                     (run 'gitnest in' first)"
                .into(),
        }
        .into());
    }
    debug!("Extract preconditions satisfied");
    Ok(())
}

/// # Check Restore Preconditions (`check_restore`)
///
/// Checks that a restore run may start: the archive must be a regular file
/// and no staging area may exist.
///
/// # Errors
///
/// Returns `NestError::PreconditionViolation` if:
/// - The archive is missing or is not a regular file.
/// - A staging area is left over from an earlier run.
pub fn check_restore(cfg: &NestConfig) -> Result<()> {
    let archive = cfg.archive_path();
    if !archive.is_file() {
        let reason = if entry_exists(&archive) {
            "archive path exists but is not a regular file"
        } else {
            "archive not found; nothing to restore"
        };
        return Err(NestError::PreconditionViolation {
            path: archive,
            reason: reason.into(),
        }
        .into());
    }
    check_no_staging(cfg)?;
    debug!("Restore preconditions satisfied");
    Ok(())
}

fn check_no_staging(cfg: &NestConfig) -> Result<()> {
    let staging = cfg.staging_dir();
    if entry_exists(&staging) {
        return Err(NestError::PreconditionViolation {
            path: staging,
            reason: "staging area already exists, probably left over from an interrupted run"
                .into(),
        }
        .into());
    }
    Ok(())
}
