//! # gitnest Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! One module per mode of the CLI. Each defines its (empty) argument struct
//! and a `handle_*` function that builds the run configuration, calls into
//! `core::archiver`, and reports the result to the operator.
//!
//! - `out`: park nested VCS metadata in the archive
//! - `restore`: put it back (`gitnest in`; `in` is a Rust keyword)
//!

/// `gitnest out`: extract nested metadata into the archive.
pub mod out;
/// `gitnest in`: restore metadata from the archive.
pub mod restore;
