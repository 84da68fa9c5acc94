//! # gitnest Metadata Selector
//!
//! File: cli/src/core/selector.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Walks the working root and returns every entry whose name is one of the
//! metadata names (`.git`, `.gitignore`, `.gitattributes`, `.gitmodules`,
//! `.gitkeep`) and that sits at least one directory below the root.
//!
//! ## Rules
//!
//! - Direct children of the root are never selected: they belong to the
//!   parent repository. The walk does not descend into the root's own `.git`
//!   either.
//! - The staging area is skipped entirely.
//! - Matches below an already matched directory are still reported
//!   (`sub/.git/info/.gitkeep` next to `sub/.git`). The archiver stages
//!   shallow entries first and treats such descendants as already moved.
//! - Symlinks are not followed; a matching symlink is one entry.
//! - Results are sorted by path.
//!
use crate::core::config::NestConfig; // Root path and name matcher
use crate::core::error::Result; // Crate-wide Result
use anyhow::{anyhow, Context}; // Error construction and context
use std::path::PathBuf; // Owned path type
use tracing::{debug, info, warn}; // Logging utilities
use walkdir::{DirEntry, WalkDir}; // Recursive directory traversal

/// One selected metadata entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Path relative to the working root.
    pub relative: PathBuf,
    /// Absolute path at selection time.
    pub absolute: PathBuf,
    /// Whether the entry is a real directory (symlinks report `false`).
    pub is_dir: bool,
}

impl MetadataEntry {
    /// Number of path components; the root's children have depth 1.
    pub fn depth(&self) -> usize {
        self.relative.components().count()
    }
}

/// # Select Nested Metadata (`select`)
///
/// Selects nested metadata entries below `cfg.root()`.
///
/// # Arguments
///
/// * `cfg` - The run configuration (root, staging name, name patterns).
///
/// # Returns
///
/// * `Result<Vec<MetadataEntry>>` - Matches at depth two or more, sorted by
///   path. Entries inside an already matched directory are included.
///
/// # Errors
///
/// Returns an `Err` only if the root itself cannot be read. Unreadable
/// subdirectories are logged and skipped.
pub fn select(cfg: &NestConfig) -> Result<Vec<MetadataEntry>> {
    let root = cfg.root();
    info!("Scanning {} for nested VCS metadata", root.display());

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned(cfg, e));

    let mut selected = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("Failed to read {}", root.display()));
            }
            Err(e) => {
                warn!("Skipping unreadable entry during scan: {}", e);
                continue;
            }
        };

        if entry.depth() < 2 || !cfg.is_metadata_name(entry.file_name()) {
            continue;
        }

        let relative = pathdiff::diff_paths(entry.path(), root).ok_or_else(|| {
            anyhow!(
                "Could not determine path of {} relative to {}",
                entry.path().display(),
                root.display()
            )
        })?;
        debug!("Selected: {}", relative.display());
        selected.push(MetadataEntry {
            relative,
            absolute: entry.path().to_path_buf(),
            is_dir: entry.file_type().is_dir(),
        });
    }

    info!("Selected {} metadata entries", selected.len());
    Ok(selected)
}

/// Top-level entries the walk must not enter: the staging area and the
/// parent repository's own metadata.
fn is_pruned(cfg: &NestConfig, entry: &DirEntry) -> bool {
    if entry.depth() != 1 {
        return false;
    }
    let name = entry.file_name();
    name == cfg.staging_dir_name() || cfg.is_metadata_name(name)
}
