// src/classify/classify_stats.rs

use std::path::Path;
use crate::types::FileSummaryRow;

/// Per-file bucket sizes.
///
/// `with_sites` is the number of amplicon reads carrying the cutting site at
/// least once; the ONE / TWO / THREE_PLUS buckets must add up to it exactly.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketCounts {
    /// Amplicon reads coming out of the extractor
    pub total_reads: usize,
    /// Reads with >= 1 occurrence
    pub with_sites: usize,
    pub one: usize,
    pub two: usize,
    pub three_plus: usize,
}

impl BucketCounts {
    /// Reported column: reads with one or two sites.
    pub fn one_or_two(&self) -> usize {
        self.one + self.two
    }

    /// Reads that never matched the site.
    pub fn no_site(&self) -> usize {
        self.total_reads - self.with_sites
    }

    pub fn is_partition(&self) -> bool {
        self.one + self.two + self.three_plus == self.with_sites
            && self.with_sites <= self.total_reads
    }

    /// Fails loudly in debug builds, logs in release builds.
    pub fn check_partition(&self, path: &Path) -> bool {
        debug_assert_eq!(
            self.one + self.two + self.three_plus,
            self.with_sites,
            "bucket partition broken for {}",
            path.display()
        );
        if !self.is_partition() {
            log::error!(
                "Bucket partition broken for {}: {} + {} + {} != {}",
                path.display(),
                self.one,
                self.two,
                self.three_plus,
                self.with_sites
            );
            return false;
        }
        true
    }

    pub fn to_row(&self, path: &Path) -> FileSummaryRow {
        FileSummaryRow {
            path: path.to_path_buf(),
            total_reads: self.total_reads,
            with_sites: self.with_sites,
            one: self.one,
            one_or_two: self.one_or_two(),
            three_plus: self.three_plus,
        }
    }
}
