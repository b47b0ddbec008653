//src/types.rs

use std::path::PathBuf;

/// A minimal representation of a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DNASequence {
    pub id: String,
    pub header_line: String,
    pub seq: String,
    pub quals: String,
}

/// The mutually exclusive outcomes for an amplicon read.
/// `Zero` reads never reach the summary; they are filtered out upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Zero,
    One,
    Two,
    ThreePlus,
}

impl Bucket {
    /// Bucket for a given cutting-site occurrence count.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Bucket::Zero,
            1 => Bucket::One,
            2 => Bucket::Two,
            _ => Bucket::ThreePlus,
        }
    }
}

/// One row of the run summary, in processing order.
/// For example:
///  File  Total Reads  With Cutting Sites  One  One or Two  Three or More
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummaryRow {
    pub path: PathBuf,
    pub total_reads: usize,
    pub with_sites: usize,
    pub one: usize,
    pub one_or_two: usize,
    pub three_plus: usize,
}
