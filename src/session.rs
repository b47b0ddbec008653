//src/session.rs

use ahash::{AHashMap, AHashSet};
use std::path::{Path, PathBuf};

use crate::tracker::RunTracker;
use crate::types::FileSummaryRow;

/// State of one monitoring session: which files are done, the summary rows
/// so far, and how often each failing file has been attempted.
///
/// Lives in memory only; a restart starts from scratch.
#[derive(Debug, Default)]
pub struct Session {
    processed: AHashSet<PathBuf>,
    failures: AHashMap<PathBuf, u32>,
    tracker: RunTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, path: &Path) -> bool {
        self.processed.contains(path)
    }

    /// `discovered - processed`, keeping discovery order.
    pub fn new_files(&self, discovered: Vec<PathBuf>) -> Vec<PathBuf> {
        discovered
            .into_iter()
            .filter(|p| !self.processed.contains(p))
            .collect()
    }

    /// Record a successful file. Returns false, and records nothing, if the
    /// file was already completed in this session.
    pub fn complete(&mut self, path: &Path, row: FileSummaryRow) -> bool {
        if !self.processed.insert(path.to_path_buf()) {
            log::warn!("{} already processed, ignoring duplicate result", path.display());
            return false;
        }
        self.failures.remove(path);
        self.tracker.record(row);
        true
    }

    /// Count a failed attempt; returns the number of failures so far.
    pub fn record_failure(&mut self, path: &Path) -> u32 {
        let attempts = self.failures.entry(path.to_path_buf()).or_insert(0);
        *attempts += 1;
        *attempts
    }

    pub fn failures(&self, path: &Path) -> u32 {
        self.failures.get(path).copied().unwrap_or(0)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }
}
