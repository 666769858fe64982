//! Compatibility checking between two environment snapshots
//!
//! Comparison is by exact string equality of version strings. `1.0` and
//! `1.0.0` differ, and so do `2.0.0` and `2.0.0+build5`; no version
//! semantics are applied.

use std::collections::BTreeSet;
use std::fmt;
use verpack_environment::Snapshot;

/// How a distribution differs between the two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    /// Recorded when written, not installed now
    MissingNow,
    /// Installed now, not recorded when written
    MissingThen,
    /// Present in both with different version strings
    VersionChanged,
}

/// One differing distribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Distribution name
    pub distribution: String,
    /// Kind of difference
    pub kind: MismatchKind,
    /// Version in the writing environment
    pub old_version: Option<String>,
    /// Version in the reading environment
    pub new_version: Option<String>,
}

/// Ordered list of mismatches, sorted by distribution name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MismatchReport {
    entries: Vec<Mismatch>,
}

impl MismatchReport {
    /// True if the snapshots agree
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of mismatches
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Mismatches in order
    pub fn iter(&self) -> impl Iterator<Item = &Mismatch> {
        self.entries.iter()
    }

    /// Mismatches as a slice
    pub fn entries(&self) -> &[Mismatch] {
        &self.entries
    }

    /// Mismatches of one kind
    pub fn of_kind(&self, kind: MismatchKind) -> impl Iterator<Item = &Mismatch> {
        self.entries.iter().filter(move |m| m.kind == kind)
    }

    /// Mismatch for one distribution
    pub fn get(&self, distribution: &str) -> Option<&Mismatch> {
        self.entries.iter().find(|m| m.distribution == distribution)
    }

    /// Same report without distributions that only exist in the reading environment
    pub fn without_missing_then(self) -> Self {
        MismatchReport {
            entries: self
                .entries
                .into_iter()
                .filter(|m| m.kind != MismatchKind::MissingThen)
                .collect(),
        }
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packages from writing and reading environment do not match ({} difference{})",
            self.entries.len(),
            if self.entries.len() == 1 { "" } else { "s" }
        )?;
        for m in &self.entries {
            write!(
                f,
                "\n  {}: {} -> {}",
                m.distribution,
                m.old_version.as_deref().unwrap_or("<missing>"),
                m.new_version.as_deref().unwrap_or("<missing>")
            )?;
        }
        Ok(())
    }
}

/// Diff of two snapshots
pub struct CompatibilityChecker;

impl CompatibilityChecker {
    /// Compare the writing environment `old` against the reading environment `new`
    ///
    /// Total and deterministic; `compare(s, s)` is always empty. Runtime
    /// versions are not compared.
    pub fn compare(old: &Snapshot, new: &Snapshot) -> MismatchReport {
        let names: BTreeSet<&String> = old.packages().keys().chain(new.packages().keys()).collect();

        let entries = names
            .into_iter()
            .filter_map(|name| {
                let before = old.version_of(name);
                let after = new.version_of(name);
                let kind = match (before, after) {
                    (Some(_), None) => MismatchKind::MissingNow,
                    (None, Some(_)) => MismatchKind::MissingThen,
                    (Some(b), Some(a)) if b != a => MismatchKind::VersionChanged,
                    _ => return None,
                };
                Some(Mismatch {
                    distribution: name.clone(),
                    kind,
                    old_version: before.map(str::to_string),
                    new_version: after.map(str::to_string),
                })
            })
            .collect();

        MismatchReport { entries }
    }
}
