//! # gitnest Move Operations
//!
//! File: cli/src/common/fs/relocate.rs
//! Author: Christi Mahu
//!

//! ## Overview
//!
//! Moves a single filesystem entry (file, directory, or symlink) to a new
//! path. Both archiver directions are built on this: extract moves metadata
//! into the staging area, restore moves it back out.
//!
//! ## Architecture
//!
//! - A plain `fs::rename` is tried first. Inside one working tree this is the
//!   common case and moves whole directories in a single step.
//! - When `rename` fails and the source is still there (typically because the
//!   source and destination sit on different mount points), the move falls
//!   back to `fs_extra`, which copies the entry and then deletes the source.
//! - Symlinks are never followed: the link itself is moved.
//!
//! Whether an existing destination may be replaced is decided by the caller
//! through `Overwrite`.
//!
use crate::common::fs::io::entry_exists; // lstat-based existence check
use crate::core::error::Result; // Crate-wide Result
use anyhow::{anyhow, bail, Context}; // Error construction and context
use std::fs; // Standard filesystem module
use std::path::Path; // Filesystem path type
use tracing::{debug, warn}; // Logging utilities

/// Policy for an already existing destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Fail if anything exists at the destination.
    Never,
    /// Replace an existing *file* at the destination. Directories are never replaced.
    Files,
}

/// # Move Entry (`move_entry`)
///
/// Moves `source` to `target`. The parent of `target` must already exist.
///
/// # Arguments
///
/// * `source` - The file, directory, or symlink to move.
/// * `target` - Its new path.
/// * `overwrite` - What to do if something already exists at `target`.
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` once `source` is gone and `target` holds its content.
///
/// # Errors
///
/// Returns an `Err` if:
/// - `source` does not exist.
/// - `target` exists and `overwrite` does not allow replacing it.
/// - Both the rename and the copy-and-delete fallback fail.
pub fn move_entry(source: &Path, target: &Path, overwrite: Overwrite) -> Result<()> {
    let meta = fs::symlink_metadata(source)
        .with_context(|| format!("Source no longer exists: {}", source.display()))?;

    let target_existed = entry_exists(target);
    if target_existed {
        let target_is_dir = fs::symlink_metadata(target)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        match overwrite {
            Overwrite::Never => bail!("Destination already exists: {}", target.display()),
            Overwrite::Files if target_is_dir => {
                bail!("Destination is a directory: {}", target.display())
            }
            Overwrite::Files => debug!("Replacing existing file: {}", target.display()),
        }
    }

    match fs::rename(source, target) {
        Ok(()) => {
            debug!("Renamed {} -> {}", source.display(), target.display());
            Ok(())
        }
        Err(rename_err) => {
            if !entry_exists(source) {
                return Err(rename_err).with_context(|| {
                    format!("Failed to move {} to {}", source.display(), target.display())
                });
            }
            warn!(
                "rename {} -> {} failed ({}), falling back to copy and delete",
                source.display(),
                target.display(),
                rename_err
            );
            let moved = copy_and_delete(source, target, meta.file_type());
            if moved.is_err() && !target_existed && entry_exists(source) {
                // Drop the partial copy so the entry lives in one place only.
                discard_copy(target);
            }
            moved
        }
    }
}

fn discard_copy(target: &Path) {
    let removed = match fs::symlink_metadata(target) {
        Ok(m) if m.is_dir() => fs::remove_dir_all(target),
        Ok(_) => fs::remove_file(target),
        Err(_) => return,
    };
    if let Err(e) = removed {
        warn!("Could not remove partial copy {}: {}", target.display(), e);
    }
}

/// Copy-then-delete move for entries `rename` cannot handle.
fn copy_and_delete(source: &Path, target: &Path, file_type: fs::FileType) -> Result<()> {
    if file_type.is_symlink() {
        // A symlink cannot cross devices via fs_extra without being followed;
        // recreate the link itself instead.
        let link_target = fs::read_link(source)
            .with_context(|| format!("Failed to read link {}", source.display()))?;
        if entry_exists(target) {
            fs::remove_file(target)
                .with_context(|| format!("Failed to replace {}", target.display()))?;
        }
        create_symlink(&link_target, target)?;
        fs::remove_file(source)
            .with_context(|| format!("Failed to remove moved link {}", source.display()))?;
        return Ok(());
    }

    if file_type.is_dir() {
        let parent = target
            .parent()
            .ok_or_else(|| anyhow!("Destination has no parent: {}", target.display()))?;
        // fs_extra moves the directory *into* `parent`, keeping its name.
        if source.file_name() != target.file_name() {
            bail!(
                "Cannot move directory {} to differently named {}",
                source.display(),
                target.display()
            );
        }
        let options = fs_extra::dir::CopyOptions::new();
        fs_extra::dir::move_dir(source, parent, &options).map_err(|e| {
            anyhow!(e).context(format!(
                "Failed to move directory {} to {}",
                source.display(),
                target.display()
            ))
        })?;
    } else {
        let mut options = fs_extra::file::CopyOptions::new();
        options.overwrite = true;
        fs_extra::file::move_file(source, target, &options).map_err(|e| {
            anyhow!(e).context(format!(
                "Failed to move file {} to {}",
                source.display(),
                target.display()
            ))
        })?;
    }
    debug!("Copied and removed {} -> {}", source.display(), target.display());
    Ok(())
}

#[cfg(unix)]
fn create_symlink(link_target: &Path, at: &Path) -> Result<()> {
    std::os::unix::fs::symlink(link_target, at)
        .with_context(|| format!("Failed to create symlink {}", at.display()))
}

#[cfg(windows)]
fn create_symlink(link_target: &Path, at: &Path) -> Result<()> {
    std::os::windows::fs::symlink_file(link_target, at)
        .with_context(|| format!("Failed to create symlink {}", at.display()))
}
