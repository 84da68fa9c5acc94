//! # gitnest TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module packs a directory tree into a gzipped tarball (`.tar.gz`) on
//! disk and unpacks such a tarball back into a directory. gitnest uses it to
//! turn the staging area into the sidecar archive and back.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for building the archive structure and
//! the `flate2` crate for Gzip compression.
//!
//! - Entries are stored with paths relative to the packed directory, so
//!   unpacking into an empty directory reproduces the tree exactly.
//! - The walk is sorted by file name, which makes archives of identical trees
//!   list their members in the same order.
//! - Symbolic links are stored as links (never followed).
//! - Unpacking relies on `tar::Archive::unpack`, which refuses members that
//!   would land outside the destination directory.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::tar;
//!
//! let members = tar::pack_directory(&cfg.staging_dir(), &cfg.archive_path())?;
//! tar::unpack_archive(&cfg.archive_path(), &cfg.staging_dir())?;
//! let listed = tar::list_members(&cfg.archive_path())?;
//! ```
//!
use crate::core::error::Result;
use anyhow::{anyhow, Context};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// # Pack Directory (`pack_directory`)
///
/// Writes a gzipped TAR archive at `archive_path` containing everything below
/// `source_dir` (the directory itself is not a member).
///
/// ## Returns
///
/// * `Result<usize>` - The number of members written.
///
/// ## Errors
///
/// Returns an `Err` if the archive file cannot be created, any entry cannot be
/// read or appended, or finishing the TAR / Gzip streams fails. A partially
/// written archive file is left for the caller to deal with.
pub fn pack_directory(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create archive file {}", archive_path.display()))?;
    // Gzip encoder over a buffered writer, default compression level.
    let enc = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(enc);
    // Store symlinks as symlinks.
    builder.follow_symlinks(false);

    let mut members = 0;
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| {
            format!("Failed to walk {} while packing", source_dir.display())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| anyhow!("Entry outside packed directory: {}", entry.path().display()))?;

        let appended = if entry.file_type().is_dir() {
            builder.append_dir(relative, entry.path())
        } else {
            builder.append_path_with_name(entry.path(), relative)
        };
        appended
            .with_context(|| format!("Failed to add '{}' to the archive", relative.display()))?;

        trace!("Packed member: {}", relative.display());
        members += 1;
    }

    // Finalize the TAR structure, then the Gzip stream, then flush the file.
    let encoder = builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    let writer = encoder
        .finish()
        .context("Failed to finish gzip compression stream")?;
    writer
        .into_inner()
        .map_err(|e| anyhow!(e.into_error()))
        .context("Failed to flush archive file")?
        .sync_all()
        .context("Failed to sync archive file to disk")?;

    debug!(
        "Packed {} member(s) from {} into {}",
        members,
        source_dir.display(),
        archive_path.display()
    );
    Ok(members)
}

/// # Unpack Archive (`unpack_archive`)
///
/// Extracts every member of the gzipped TAR archive at `archive_path` into
/// `dest_dir`, which must already exist. File permissions and modification
/// times stored in the archive are restored.
///
/// ## Errors
///
/// Returns an `Err` if the archive cannot be opened, is not a valid gzipped
/// tarball, or any member cannot be written.
pub fn unpack_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);
    archive.unpack(dest_dir).with_context(|| {
        format!(
            "Failed to unpack {} into {}",
            archive_path.display(),
            dest_dir.display()
        )
    })?;
    debug!(
        "Unpacked {} into {}",
        archive_path.display(),
        dest_dir.display()
    );
    Ok(())
}

/// Lists member paths of a gzipped TAR archive in stored order.
#[cfg(test)]
pub fn list_members(archive_path: &Path) -> Result<Vec<std::path::PathBuf>> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut members = Vec::new();
    for entry in archive
        .entries()
        .with_context(|| format!("Failed to read archive {}", archive_path.display()))?
    {
        let entry = entry.context("Failed to read archive member")?;
        let path = entry.path().context("Archive member has an invalid path")?;
        // Directories are stored with a trailing slash; PathBuf drops it.
        members.push(path.components().collect());
    }
    Ok(members)
}
