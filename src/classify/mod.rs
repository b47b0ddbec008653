pub mod classify_reads;
pub mod classify_stats;

pub use classify_reads::{classify_reads_parallel, ClassifiedReads};
pub use classify_stats::BucketCounts;
