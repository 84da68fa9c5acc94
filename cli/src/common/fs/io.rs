//! # gitnest Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!

//! ## Overview
//!
//! Thin wrappers around `std::fs` used by the archiver: ensuring a directory
//! exists, creating a directory that must *not* exist yet, and removing the
//! transient staging area and archive. Every wrapper adds context naming the
//! path involved, so per-item failure reports and fatal errors are readable
//! without a debugger.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::create_fresh_dir(&cfg.staging_dir())?;         // fails if it exists
//! io::ensure_dir_exists(&staging.join("sub"))?;      // mkdir -p
//! io::remove_dir_recursive(&cfg.staging_dir())?;
//! io::remove_file(&cfg.archive_path())?;
//! ```
//!
use crate::core::error::Result; // Crate-wide anyhow-based Result
use anyhow::Context; // For adding path context to errors
use std::fs; // Standard filesystem module
use std::path::Path; // Filesystem path type
use tracing::debug; // Logging of every mutation

/// Ensures that a directory exists at the specified path.
///
/// Creates the directory and any missing parents (like `mkdir -p`). If the
/// path already exists but is not a directory, an error is returned.
///
/// # Arguments
///
/// * `path` - The directory that must exist afterwards.
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` if the directory already existed or was created.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        debug!("Created directory: {}", path.display());
    } else if !path.is_dir() {
        anyhow::bail!("Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Creates a single new, empty directory.
///
/// Unlike `ensure_dir_exists` this fails when anything already exists at
/// `path`; the staging area must always start out empty.
///
/// # Arguments
///
/// * `path` - The directory to create. Its parent must exist.
///
/// # Errors
///
/// Returns an `Err` if anything exists at `path` or the parent is missing.
pub fn create_fresh_dir(path: &Path) -> Result<()> {
    fs::create_dir(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))?;
    debug!("Created fresh directory: {}", path.display());
    Ok(())
}

/// Recursively removes a directory and everything below it.
///
/// # Arguments
///
/// * `path` - The directory to remove. A symlink is removed as a link.
///
/// # Errors
///
/// Returns an `Err` naming `path` if it is missing or any part of the tree
/// cannot be removed.
pub fn remove_dir_recursive(path: &Path) -> Result<()> {
    fs::remove_dir_all(path)
        .with_context(|| format!("Failed to remove directory {}", path.display()))?;
    debug!("Removed directory: {}", path.display());
    Ok(())
}

/// Removes a single file (or symlink).
///
/// # Errors
///
/// Returns an `Err` naming `path` if it is missing or is a directory.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("Failed to remove file {}", path.display()))?;
    debug!("Removed file: {}", path.display());
    Ok(())
}

/// True if anything (file, directory, or symlink, even a dangling one) exists at `path`.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
