//! # gitnest Core
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Domain logic of the metadata round trip plus the infrastructure it rests on.
//!
//! - `config`: the immutable per-run `NestConfig` (root, fixed names, patterns)
//! - `error`: `NestError` and the `Result` alias
//! - `report`: per-item `PhaseReport`s returned by bulk phases
//! - `guard`: pre-flight existence checks on archive and staging area
//! - `selector`: finds nested VCS metadata below the root
//! - `archiver`: the extract and restore directions
//!
//! ```rust
//! use crate::core::{archiver, config::NestConfig};
//!
//! let cfg = NestConfig::from_current_dir()?;
//! let extraction = archiver::extract(&cfg)?;
//! ```
//!
pub mod archiver;
pub mod config;
pub mod error;
pub mod guard;
pub mod report;
pub mod selector;
