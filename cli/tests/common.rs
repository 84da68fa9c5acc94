//! # gitnest CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`main_tests.rs`,
//! `out.rs`, `roundtrip.rs`): locating the compiled binary and building
//! throwaway working trees.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const STAGING_DIR: &str = ".gitnest-staging";
pub const ARCHIVE_FILE: &str = ".gitnest-archive.tar.gz";

/// # Get gitnest Command (`gitnest_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `gitnest` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn gitnest_cmd() -> Command {
    Command::cargo_bin("gitnest").expect("Failed to find gitnest binary for testing")
}

/// `gitnest_cmd()` running inside `root` with colors disabled.
pub fn gitnest_in(root: &Path) -> Command {
    let mut cmd = gitnest_cmd();
    cmd.current_dir(root).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Writes `content` at `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("relative path has a parent"))
        .expect("Failed to create parent directories");
    fs::write(&path, content).expect("Failed to write fixture file");
}

pub fn read_file(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
}

/// Working tree with the parent repository's own metadata plus a nested
/// repository (`sub/.git/...`, `sub/.gitignore`, `sub/nested/.gitmodules`).
pub fn nested_repo_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp working tree");
    let root = dir.path();
    write_file(root, ".gitignore", "/target\n");
    write_file(root, ".git/HEAD", "ref: refs/heads/main\n");
    write_file(root, "sub/.git/config", "[core]\n\trepositoryformatversion = 0\n");
    write_file(root, "sub/.git/HEAD", "ref: refs/heads/dev\n");
    write_file(root, "sub/.gitignore", "*.o\n");
    write_file(root, "sub/nested/.gitmodules", "[submodule \"x\"]\n\tpath = x\n");
    write_file(root, "sub/src/lib.rs", "pub fn f() {}\n");
    dir
}
