//! # gitnest Phase Reports
//!
//! File: cli/src/core/report.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Extract and restore are bulk operations that keep going when a single item
//! fails. The per-item phases (stage, restore, cleanup) therefore return a
//! `PhaseReport` instead of bailing out on the first problem: it lists what
//! happened to every item and which items failed, and the caller decides
//! whether the accumulated failures escalate to a fatal `NestError`.
//!
use std::fmt;
use std::path::PathBuf;

/// Phase of a run that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stage,
    Restore,
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Stage => "stage",
            Phase::Restore => "restore",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// What happened to a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry was moved to its destination.
    Moved,
    /// The entry travelled with an ancestor that was moved earlier in the run.
    Covered { ancestor: PathBuf },
    /// A directory was created at the destination.
    Created,
    /// A directory already existed at the destination and was left alone.
    Kept,
    /// A transient artifact (staging area, archive) was removed.
    Removed,
}

/// A recovered, per-item failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Path relative to the working root (or absolute for cleanup targets).
    pub path: PathBuf,
    /// Human readable cause, including the underlying error chain.
    pub reason: String,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Per-item results of one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub outcomes: Vec<(PathBuf, Outcome)>,
    pub failures: Vec<ItemFailure>,
}

impl PhaseReport {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, path: impl Into<PathBuf>, outcome: Outcome) {
        self.outcomes.push((path.into(), outcome));
    }

    /// Records a failure, flattening the error chain into the reason.
    pub fn fail(&mut self, path: impl Into<PathBuf>, err: &anyhow::Error) {
        self.failures.push(ItemFailure {
            path: path.into(),
            reason: format!("{:#}", err),
        });
    }

    /// True when no item failed.
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of items with the given kind of outcome.
    pub fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Moved))
    }

    /// Outcome recorded for a path, if any.
    #[cfg(test)]
    pub fn outcome_of(&self, path: &std::path::Path) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, o)| o)
    }
}
