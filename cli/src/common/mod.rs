//! # gitnest Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!

//! ## Overview
//!
//! Shared utilities that are not specific to either direction of the
//! metadata round trip. Domain logic (guard, selector, archiver) lives in
//! `core::`; command wiring lives in `commands::`.
//!
//! - **`archive`**: gzipped tarball packing, unpacking, and listing.
//! - **`fs`**: directory creation and removal, single-entry moves.
//! - **`ui`**: colored operator messages and report printing.
//!

/// Gzipped tarball handling for the sidecar archive.
pub mod archive;
/// Filesystem helpers (I/O, moves).
pub mod fs;
/// Operator-facing console messages.
pub mod ui;
