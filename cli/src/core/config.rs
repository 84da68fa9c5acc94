//! # gitnest Run Configuration
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! gitnest has no configuration files: the staging directory name, the archive
//! file name and the metadata name list are part of its external contract.
//! They are gathered into one immutable `NestConfig` value, built once per run
//! from the working root and passed explicitly to the guard, selector and
//! archiver.
//!
//! ## Examples
//!
//! ```rust
//! let cfg = NestConfig::from_current_dir()?;
//! let staging = cfg.staging_dir();   // <root>/.gitnest-staging
//! let archive = cfg.archive_path();  // <root>/.gitnest-archive.tar.gz
//! assert!(cfg.is_metadata_name(OsStr::new(".gitmodules")));
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the transient staging directory at the top of the working root.
pub const STAGING_DIR_NAME: &str = ".gitnest-staging";

/// Name of the archive file at the top of the working root.
pub const ARCHIVE_FILE_NAME: &str = ".gitnest-archive.tar.gz";

/// Names identifying VCS metadata, in match order.
///
/// `.git` is normally a directory but is matched by name alone, so the
/// `.git` file a submodule or linked worktree uses as its gitdir pointer is
/// parked as well.
pub const METADATA_NAMES: &[&str] = &[
    ".git",
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".gitkeep",
];

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestConfig {
    root: PathBuf,
    staging_dir_name: &'static str,
    archive_file_name: &'static str,
    metadata_names: &'static [&'static str],
}

impl NestConfig {
    /// Builds the configuration for the given working root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staging_dir_name: STAGING_DIR_NAME,
            archive_file_name: ARCHIVE_FILE_NAME,
            metadata_names: METADATA_NAMES,
        }
    }

    /// Builds the configuration for the process's current working directory.
    pub fn from_current_dir() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to get current directory")?;
        debug!("Working root: {}", root.display());
        Ok(Self::new(root))
    }

    /// The working root every relative path is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn staging_dir_name(&self) -> &str {
        self.staging_dir_name
    }

    pub fn archive_file_name(&self) -> &str {
        self.archive_file_name
    }

    pub fn metadata_names(&self) -> &[&'static str] {
        self.metadata_names
    }

    /// Absolute path of the staging directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(self.staging_dir_name)
    }

    /// Absolute path of the archive file.
    pub fn archive_path(&self) -> PathBuf {
        self.root.join(self.archive_file_name)
    }

    /// Whether a single path component names VCS metadata.
    pub fn is_metadata_name(&self, name: &OsStr) -> bool {
        let Some(name) = name.to_str() else {
            return false;
        };
        self.metadata_names()
            .iter()
            .any(|pattern| names_equal(pattern, name))
    }
}

// Follows the default case sensitivity of the host's usual filesystem.
#[cfg(any(target_os = "macos", target_os = "windows"))]
fn names_equal(pattern: &str, name: &str) -> bool {
    pattern.eq_ignore_ascii_case(name)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn names_equal(pattern: &str, name: &str) -> bool {
    pattern == name
}
