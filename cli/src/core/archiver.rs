//! # gitnest Archiver
//!
//! File: cli/src/core/archiver.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The two directions of the metadata round trip.
//!
//! **Extract** (`gitnest out`):
//! 1. Guard: no archive, no staging area.
//! 2. Select nested metadata; nothing selected means nothing to do.
//! 3. Create the staging area and move every entry into it at its relative
//!    path, shallowest first. Single failures are logged and recorded.
//! 4. Pack the staging area into the archive.
//! 5. Remove the staging area.
//!
//! **Restore** (`gitnest in`):
//! 1. Guard: archive present, no staging area.
//! 2. Unpack the archive into a fresh staging area.
//! 3. Re-lay every staged entry onto the tree: directories are created only
//!    where nothing exists, files are moved in and replace existing files.
//! 4. Remove the staging area, then the archive.
//!
//! ## Failure Policy
//!
//! - Guard violations abort before anything is touched.
//! - A pack failure keeps the staging area (it holds the only copy of the moved
//!   metadata) and removes the partially written archive.
//! - An unpack failure removes the partial staging area; the archive is intact.
//! - Per-item move failures never abort a phase. An extract that staged
//!   nothing, or a restore that left items behind, is escalated to an error
//!   after the phase finishes. A restore with failures keeps the archive.
//! - Cleanup failures after a successful run are reported but do not fail it.
//!
use crate::common::archive::tar;
use crate::common::fs::io;
use crate::common::fs::relocate::{move_entry, Overwrite};
use crate::core::config::NestConfig;
use crate::core::error::{NestError, Result};
use crate::core::guard;
use crate::core::report::{Outcome, Phase, PhaseReport};
use crate::core::selector::{self, MetadataEntry};
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result of an extract run that did not fail.
#[derive(Debug)]
pub enum Extraction {
    /// No nested metadata was found; nothing was touched.
    NothingToDo,
    /// Metadata was parked in the archive.
    Parked {
        stage: PhaseReport,
        members: usize,
        cleanup: PhaseReport,
    },
}

/// Result of a restore run that did not fail.
#[derive(Debug)]
pub struct Restoration {
    pub restore: PhaseReport,
    pub cleanup: PhaseReport,
}

/// Runs the extract direction against `cfg.root()`.
pub fn extract(cfg: &NestConfig) -> Result<Extraction> {
    guard::check_extract(cfg)?;

    let entries = selector::select(cfg)?;
    if entries.is_empty() {
        info!("No nested VCS metadata found; nothing to extract");
        return Ok(Extraction::NothingToDo);
    }
    park_entries(cfg, &entries)
}

/// Stages, packs, and cleans up an already selected, non-empty set of entries.
///
/// Items that fail to move stay in the tree and are listed in the stage
/// report; the run still succeeds as long as at least one entry was staged.
fn park_entries(cfg: &NestConfig, entries: &[MetadataEntry]) -> Result<Extraction> {
    let staging = cfg.staging_dir();
    io::create_fresh_dir(&staging).context("Failed to create staging area")?;

    let stage = stage_entries(cfg, entries);
    if stage.moved() == 0 {
        // Nothing left the tree, so there is nothing to archive either.
        if let Err(e) = io::remove_dir_recursive(&staging) {
            warn!("{:#}", e);
        }
        return Err(NestError::NothingRelocated {
            selected: entries.len(),
        }
        .into());
    }

    let members = pack_staging(cfg)?;
    let cleanup = remove_artifacts(&[staging]);
    Ok(Extraction::Parked {
        stage,
        members,
        cleanup,
    })
}

/// Runs the restore direction against `cfg.root()`.
///
/// The archive is deleted only when every staged item made it back. If any
/// item fails, the staging area is dropped but the archive is kept as the
/// only complete copy, and the run fails with `NestError::RestoreIncomplete`
/// so `gitnest in` can be repeated once the cause is fixed.
pub fn restore(cfg: &NestConfig) -> Result<Restoration> {
    guard::check_restore(cfg)?;

    let staging = cfg.staging_dir();
    let archive = cfg.archive_path();
    io::create_fresh_dir(&staging).context("Failed to create staging area")?;

    info!("Unpacking {}", archive.display());
    if let Err(source) = tar::unpack_archive(&archive, &staging) {
        // The archive still holds everything; the partial copy is disposable.
        if let Err(e) = io::remove_dir_recursive(&staging) {
            warn!("{:#}", e);
        }
        return Err(NestError::ArchiveExtract { archive, source }.into());
    }

    let restore = restore_entries(cfg);
    if !restore.succeeded() {
        // Staged copies are duplicates of what the archive holds; keep only the archive.
        let cleanup = remove_artifacts(&[staging]);
        for failed in &cleanup.failures {
            warn!("cleanup failed for {}", failed);
        }
        return Err(NestError::RestoreIncomplete {
            failed: restore.failures.len(),
            archive,
        }
        .into());
    }

    let cleanup = remove_artifacts(&[staging, archive]);
    Ok(Restoration { restore, cleanup })
}

/// Moves every selected entry into the staging area under its relative path.
///
/// Entries are handled shallowest first, so a directory such as `sub/.git`
/// moves before anything selected inside it; those descendants are recorded
/// as `Outcome::Covered`.
fn stage_entries(cfg: &NestConfig, entries: &[MetadataEntry]) -> PhaseReport {
    let staging = cfg.staging_dir();
    let mut report = PhaseReport::new(Phase::Stage);

    let mut ordered: Vec<&MetadataEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        a.depth()
            .cmp(&b.depth())
            .then_with(|| a.relative.cmp(&b.relative))
    });

    let mut moved_dirs: Vec<&Path> = Vec::new();
    for entry in ordered {
        if let Some(ancestor) = moved_dirs
            .iter()
            .find(|dir| entry.relative.starts_with(dir))
        {
            debug!(
                "{} already moved with {}",
                entry.relative.display(),
                ancestor.display()
            );
            report.record(
                &entry.relative,
                Outcome::Covered {
                    ancestor: ancestor.to_path_buf(),
                },
            );
            continue;
        }

        let target = staging.join(&entry.relative);
        let moved = target
            .parent()
            .ok_or_else(|| anyhow!("Staging target has no parent: {}", target.display()))
            .and_then(io::ensure_dir_exists)
            .and_then(|()| move_entry(&entry.absolute, &target, Overwrite::Never));

        match moved {
            Ok(()) => {
                debug!("Staged {}", entry.relative.display());
                report.record(&entry.relative, Outcome::Moved);
                if entry.is_dir {
                    moved_dirs.push(&entry.relative);
                }
            }
            Err(e) => {
                warn!("Could not stage {}: {:#}", entry.relative.display(), e);
                report.fail(&entry.relative, &e);
            }
        }
    }

    info!(
        "Staged {} of {} selected entries ({} failed)",
        report.moved(),
        entries.len(),
        report.failures.len()
    );
    report
}

/// Packs the staging area into the archive.
///
/// On failure the partially written archive is removed and the staging area
/// is left exactly as it was.
fn pack_staging(cfg: &NestConfig) -> Result<usize> {
    let staging = cfg.staging_dir();
    let archive = cfg.archive_path();
    info!("Packing {} into {}", staging.display(), archive.display());

    match tar::pack_directory(&staging, &archive) {
        Ok(members) => Ok(members),
        Err(source) => {
            if io::entry_exists(&archive) {
                if let Err(e) = io::remove_file(&archive) {
                    warn!("Could not remove partial archive: {:#}", e);
                }
            }
            Err(NestError::ArchivePack {
                staging,
                archive,
                source,
            }
            .into())
        }
    }
}

/// Re-lays every entry of the staging area onto the working root.
fn restore_entries(cfg: &NestConfig) -> PhaseReport {
    let staging = cfg.staging_dir();
    let root = cfg.root();
    let mut report = PhaseReport::new(Phase::Restore);

    // Collected up front: files are moved out of the tree being walked.
    let mut staged = Vec::new();
    for entry_result in WalkDir::new(&staging)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        match entry_result {
            Ok(entry) => staged.push(entry),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| staging.clone());
                let err = anyhow!(e).context("Failed to read staged entry");
                warn!("{:#}", err);
                report.fail(path, &err);
            }
        }
    }

    for entry in staged {
        let relative = match pathdiff::diff_paths(entry.path(), &staging) {
            Some(rel) => rel,
            None => {
                let err = anyhow!("Could not determine relative path");
                report.fail(entry.path(), &err);
                continue;
            }
        };
        let dest = root.join(&relative);

        let result = if entry.file_type().is_dir() {
            restore_dir(&dest)
        } else {
            restore_item(entry.path(), &dest)
        };

        match result {
            Ok(outcome) => {
                debug!("Restored {} ({:?})", relative.display(), outcome);
                report.record(relative, outcome);
            }
            Err(e) => {
                warn!("Could not restore {}: {:#}", relative.display(), e);
                report.fail(relative, &e);
            }
        }
    }

    info!(
        "Restored {} entries ({} failed)",
        report.outcomes.len(),
        report.failures.len()
    );
    report
}

/// Directories are scaffolding: create if absent, never replace.
fn restore_dir(dest: &Path) -> Result<Outcome> {
    if io::entry_exists(dest) {
        if dest.is_dir() {
            return Ok(Outcome::Kept);
        }
        anyhow::bail!(
            "Cannot restore directory, a non-directory exists at {}",
            dest.display()
        );
    }
    io::ensure_dir_exists(dest)?;
    Ok(Outcome::Created)
}

/// Files and symlinks are content: moved in, replacing an existing file.
fn restore_item(source: &Path, dest: &Path) -> Result<Outcome> {
    if let Some(parent) = dest.parent() {
        io::ensure_dir_exists(parent)?;
    }
    move_entry(source, dest, Overwrite::Files)?;
    Ok(Outcome::Moved)
}

/// Best-effort removal of transient artifacts, in order.
///
/// A failure is recorded and the remaining paths are still processed; the
/// caller turns recorded failures into operator warnings.
fn remove_artifacts(paths: &[PathBuf]) -> PhaseReport {
    let mut report = PhaseReport::new(Phase::Cleanup);
    for path in paths {
        // Decided on the entry itself: a symlink is unlinked, never followed.
        let is_dir = std::fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let removed = if is_dir {
            io::remove_dir_recursive(path)
        } else {
            io::remove_file(path)
        };
        match removed {
            Ok(()) => report.record(path, Outcome::Removed),
            Err(e) => {
                warn!("{:#}", e);
                report.fail(path, &e);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scenario(root: &Path) {
        write(root, "sub/.git/config", "[core]\n\tbare = false\n");
        write(root, "sub/.git/HEAD", "ref: refs/heads/main\n");
        write(root, "sub/.gitignore", "target/\n");
        write(root, "sub/nested/.gitmodules", "[submodule \"lib\"]\n");
        write(root, "sub/src/main.rs", "fn main() {}\n");
        write(root, ".gitignore", "/build\n");
    }

    #[test]
    fn test_extract_parks_nested_metadata() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        scenario(root);
        let cfg = NestConfig::new(root);

        let Extraction::Parked {
            stage,
            members,
            cleanup,
        } = extract(&cfg)?
        else {
            panic!("expected metadata to be parked");
        };
        assert!(stage.succeeded());
        assert_eq!(stage.moved(), 3);
        assert!(members > 3);
        assert!(cleanup.succeeded());

        assert!(!root.join("sub/.git").exists());
        assert!(!root.join("sub/.gitignore").exists());
        assert!(!root.join("sub/nested/.gitmodules").exists());
        // Content and the root's own metadata stay.
        assert!(root.join("sub/src/main.rs").exists());
        assert!(root.join("sub/nested").is_dir());
        assert!(root.join(".gitignore").exists());

        assert!(cfg.archive_path().is_file());
        assert!(!cfg.staging_dir().exists());

        let listed: Vec<String> = tar::list_members(&cfg.archive_path())?
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        for expected in ["sub/.git/config", "sub/.gitignore", "sub/nested/.gitmodules"] {
            assert!(listed.iter().any(|m| m == expected), "missing {expected}");
        }
        Ok(())
    }

    #[test]
    fn test_round_trip_restores_identical_content() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        scenario(root);
        let cfg = NestConfig::new(root);

        extract(&cfg)?;
        // Remove the now metadata-free directory to check it comes back.
        fs::remove_dir(root.join("sub/nested"))?;

        let restoration = restore(&cfg)?;
        assert!(restoration.restore.succeeded());
        assert!(restoration.cleanup.succeeded());

        assert_eq!(
            fs::read_to_string(root.join("sub/.git/config"))?,
            "[core]\n\tbare = false\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("sub/.git/HEAD"))?,
            "ref: refs/heads/main\n"
        );
        assert_eq!(fs::read_to_string(root.join("sub/.gitignore"))?, "target/\n");
        assert_eq!(
            fs::read_to_string(root.join("sub/nested/.gitmodules"))?,
            "[submodule \"lib\"]\n"
        );
        assert!(!cfg.staging_dir().exists());
        assert!(!cfg.archive_path().exists());
        Ok(())
    }

    #[test]
    fn test_second_extract_is_refused_without_mutation() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        scenario(root);
        let cfg = NestConfig::new(root);
        extract(&cfg)?;

        // New nested metadata appears; a second run must not touch it.
        write(root, "other/.gitignore", "*.log\n");
        let before = fs::read(cfg.archive_path())?;
        let err = extract(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NestError>(),
            Some(NestError::PreconditionViolation { .. })
        ));
        assert!(root.join("other/.gitignore").exists());
        assert!(!cfg.staging_dir().exists());
        assert_eq!(fs::read(cfg.archive_path())?, before);
        Ok(())
    }

    #[test]
    fn test_nothing_to_extract_is_a_no_op() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, ".gitignore", "/build\n");
        write(root, "src/lib.rs", "");
        let cfg = NestConfig::new(root);

        assert!(matches!(extract(&cfg)?, Extraction::NothingToDo));
        assert!(!cfg.archive_path().exists());
        assert!(!cfg.staging_dir().exists());
        assert!(root.join(".gitignore").exists());
        Ok(())
    }

    #[test]
    fn test_nested_git_directory_moves_as_unit() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "vendor/lib/.git/HEAD", "ref: refs/heads/main\n");
        write(root, "vendor/lib/.git/info/.gitkeep", "");
        let cfg = NestConfig::new(root);

        let Extraction::Parked { stage, .. } = extract(&cfg)? else {
            panic!("expected metadata to be parked");
        };
        assert_eq!(stage.moved(), 1);
        assert_eq!(
            stage.outcome_of(Path::new("vendor/lib/.git/info/.gitkeep")),
            Some(&Outcome::Covered {
                ancestor: PathBuf::from("vendor/lib/.git")
            })
        );
        assert!(stage.succeeded());

        let listed = tar::list_members(&cfg.archive_path())?;
        assert!(listed
            .iter()
            .all(|m| m.starts_with("vendor")), "unexpected top-level member: {listed:?}");
        Ok(())
    }

    #[test]
    fn test_restore_overwrites_files_and_keeps_directories() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "sub/.gitignore", "original\n");
        write(root, "sub/.git/config", "original config\n");
        let cfg = NestConfig::new(root);
        extract(&cfg)?;

        // Stale file and a pre-existing directory with foreign content.
        write(root, "sub/.gitignore", "stale\n");
        write(root, "sub/.git/unrelated", "keep me\n");

        let restoration = restore(&cfg)?;
        assert_eq!(fs::read_to_string(root.join("sub/.gitignore"))?, "original\n");
        assert_eq!(
            fs::read_to_string(root.join("sub/.git/config"))?,
            "original config\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("sub/.git/unrelated"))?,
            "keep me\n"
        );
        assert_eq!(
            restoration.restore.outcome_of(Path::new("sub/.git")),
            Some(&Outcome::Kept)
        );
        Ok(())
    }

    #[test]
    fn test_restore_without_archive_is_refused() -> Result<()> {
        let tmp = tempdir()?;
        let cfg = NestConfig::new(tmp.path());
        let err = restore(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NestError>(),
            Some(NestError::PreconditionViolation { .. })
        ));
        assert!(!cfg.staging_dir().exists());
        Ok(())
    }

    #[test]
    fn test_corrupt_archive_aborts_before_restoring() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        let cfg = NestConfig::new(root);
        fs::write(cfg.archive_path(), "not a tarball")?;

        let err = restore(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NestError>(),
            Some(NestError::ArchiveExtract { .. })
        ));
        assert!(cfg.archive_path().exists());
        assert!(!cfg.staging_dir().exists());
        Ok(())
    }

    #[test]
    fn test_restore_failure_keeps_archive() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "sub/.gitignore", "original\n");
        let cfg = NestConfig::new(root);
        extract(&cfg)?;

        // A directory now occupies the file's destination.
        fs::create_dir_all(root.join("sub/.gitignore"))?;

        let err = restore(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NestError>(),
            Some(NestError::RestoreIncomplete { failed: 1, .. })
        ));
        assert!(cfg.archive_path().is_file());
        assert!(!cfg.staging_dir().exists());

        // After the operator fixes the tree, restore completes.
        fs::remove_dir(root.join("sub/.gitignore"))?;
        restore(&cfg)?;
        assert_eq!(fs::read_to_string(root.join("sub/.gitignore"))?, "original\n");
        assert!(!cfg.archive_path().exists());
        Ok(())
    }

    #[test]
    fn test_stage_failure_is_recorded_and_processing_continues() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "a/.gitignore", "a\n");
        write(root, "b/.gitignore", "b\n");
        let cfg = NestConfig::new(root);
        let entries = selector::select(&cfg)?;
        io::create_fresh_dir(&cfg.staging_dir())?;

        // The first entry vanishes between selection and staging.
        fs::remove_file(root.join("a/.gitignore"))?;
        let report = stage_entries(&cfg, &entries);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("a/.gitignore"));
        assert_eq!(report.moved(), 1);
        assert!(cfg.staging_dir().join("b/.gitignore").is_file());
        Ok(())
    }

    #[test]
    fn test_pack_failure_keeps_staging_area() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "sub/.gitignore", "x\n");
        let cfg = NestConfig::new(root);
        let entries = selector::select(&cfg)?;
        io::create_fresh_dir(&cfg.staging_dir())?;
        stage_entries(&cfg, &entries);

        // Point the archive somewhere unwritable by making its path a directory.
        fs::create_dir(cfg.archive_path())?;
        let err = pack_staging(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NestError>(),
            Some(NestError::ArchivePack { .. })
        ));
        assert!(cfg.staging_dir().join("sub/.gitignore").is_file());
        Ok(())
    }

    #[test]
    fn test_extract_fails_when_nothing_could_be_staged() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "a/.gitignore", "a\n");
        write(root, "b/.gitattributes", "* text=auto\n");
        let cfg = NestConfig::new(root);
        let entries = selector::select(&cfg)?;
        assert_eq!(entries.len(), 2);

        // Every selected entry vanishes before it can be moved.
        fs::remove_file(root.join("a/.gitignore"))?;
        fs::remove_file(root.join("b/.gitattributes"))?;

        let err = park_entries(&cfg, &entries).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NestError>(),
            Some(NestError::NothingRelocated { selected: 2 })
        ));
        assert_eq!(crate::core::error::exit_code_for(&err), 1);
        assert!(!cfg.staging_dir().exists());
        assert!(!cfg.archive_path().exists());
        Ok(())
    }

    #[test]
    fn test_extract_with_one_failed_item_still_parks_the_rest() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        write(root, "a/.gitignore", "a\n");
        write(root, "b/.gitignore", "b\n");
        let cfg = NestConfig::new(root);
        let entries = selector::select(&cfg)?;
        fs::remove_file(root.join("a/.gitignore"))?;

        let Extraction::Parked { stage, cleanup, .. } = park_entries(&cfg, &entries)? else {
            panic!("expected metadata to be parked");
        };
        assert_eq!(stage.failures.len(), 1);
        assert_eq!(stage.failures[0].path, PathBuf::from("a/.gitignore"));
        assert_eq!(stage.moved(), 1);
        assert!(cleanup.succeeded());
        assert!(!root.join("b/.gitignore").exists());
        assert!(cfg.archive_path().is_file());
        assert!(!cfg.staging_dir().exists());

        let listed = tar::list_members(&cfg.archive_path())?;
        assert!(listed.iter().any(|m| m == Path::new("b/.gitignore")));
        assert!(!listed.iter().any(|m| m.starts_with("a")));
        Ok(())
    }

    #[test]
    fn test_cleanup_failure_is_recorded_and_later_paths_still_removed() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        let missing = root.join("gone.tar.gz");
        let staging = root.join("staging");
        write(&staging, "sub/.gitignore", "x\n");
        let archive = root.join("archive.tar.gz");
        fs::write(&archive, "data")?;

        let report = remove_artifacts(&[missing.clone(), staging.clone(), archive.clone()]);
        assert_eq!(report.phase, Phase::Cleanup);
        assert!(!report.succeeded());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, missing);
        assert_eq!(
            report.outcomes,
            vec![(staging.clone(), Outcome::Removed), (archive.clone(), Outcome::Removed)]
        );
        assert!(!staging.exists());
        assert!(!archive.exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_cleanup_unlinks_symlink_without_touching_its_target() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        let target = root.join("real");
        write(&target, "keep.txt", "keep\n");
        let link = root.join("staging");
        std::os::unix::fs::symlink(&target, &link)?;

        let report = remove_artifacts(&[link.clone()]);
        assert!(report.succeeded());
        assert!(!io::entry_exists(&link));
        assert_eq!(fs::read_to_string(target.join("keep.txt"))?, "keep\n");
        Ok(())
    }
}
