//! # gitnest Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!

//! ## Overview
//!
//! Filesystem helpers shared by both archiver directions.
//!
//! - **`io`**: directory creation (`ensure_dir_exists`, `create_fresh_dir`),
//!   removal of the staging area and archive, and a symlink-aware existence check.
//! - **`relocate`**: moving one entry (file, directory, or symlink) with an
//!   explicit overwrite policy, using `rename` and falling back to `fs_extra`.
//!
//! Import from the specific submodule, e.g. `crate::common::fs::relocate::move_entry`.
//!

/// Directory creation, removal, and existence checks.
pub mod io;
/// Single-entry moves with an overwrite policy.
pub mod relocate;
