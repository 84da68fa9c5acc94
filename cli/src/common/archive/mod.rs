//! # gitnest Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Archive handling for the sidecar file that holds parked metadata.
//!
//! - **`tar`**: packs a directory into a gzipped tarball on disk, unpacks it
//!   again, and lists its members.
//!
//! ```rust
//! use crate::common::archive;
//!
//! archive::tar::pack_directory(&cfg.staging_dir(), &cfg.archive_path())?;
//! ```
//!

pub mod tar;
