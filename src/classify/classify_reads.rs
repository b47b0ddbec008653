use rayon::prelude::*;

use crate::motif::CuttingSite;
use crate::types::{Bucket, DNASequence};
use super::BucketCounts;

/// Amplicon reads split by cutting-site occurrence count.
///
/// Holds references into the caller's reads; nothing is cloned.
#[derive(Debug, Default)]
pub struct ClassifiedReads<'a> {
    pub no_site: Vec<&'a DNASequence>,
    pub one: Vec<&'a DNASequence>,
    pub two: Vec<&'a DNASequence>,
    pub three_plus: Vec<&'a DNASequence>,
}

impl<'a> ClassifiedReads<'a> {
    fn with_capacity(n: usize) -> Self {
        Self {
            no_site: Vec::with_capacity(n),
            one: Vec::with_capacity(n),
            two: Vec::with_capacity(n),
            three_plus: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, bucket: Bucket, dna: &'a DNASequence) {
        match bucket {
            Bucket::Zero => self.no_site.push(dna),
            Bucket::One => self.one.push(dna),
            Bucket::Two => self.two.push(dna),
            Bucket::ThreePlus => self.three_plus.push(dna),
        }
    }

    /// Reads with at least one site, in bucket order ONE, TWO, THREE_PLUS.
    pub fn with_sites(&self) -> impl Iterator<Item = &'a DNASequence> + '_ {
        self.one
            .iter()
            .chain(self.two.iter())
            .chain(self.three_plus.iter())
            .copied()
    }

    /// Reads in ONE or TWO.
    pub fn one_or_two(&self) -> impl Iterator<Item = &'a DNASequence> + '_ {
        self.one.iter().chain(self.two.iter()).copied()
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            total_reads: self.no_site.len()
                + self.one.len()
                + self.two.len()
                + self.three_plus.len(),
            with_sites: self.one.len() + self.two.len() + self.three_plus.len(),
            one: self.one.len(),
            two: self.two.len(),
            three_plus: self.three_plus.len(),
        }
    }

    /// Keeps input order within each bucket because rayon's reduce
    /// combines adjacent partial results left to right.
    fn merge(mut self, mut other: Self) -> Self {
        self.no_site.append(&mut other.no_site);
        self.one.append(&mut other.one);
        self.two.append(&mut other.two);
        self.three_plus.append(&mut other.three_plus);
        self
    }
}

/// Parallel bucketing of amplicon reads by direct cutting-site counts.
pub fn classify_reads_parallel<'a>(
    site: &CuttingSite,
    all_reads: &'a [DNASequence],
) -> ClassifiedReads<'a> {
    all_reads
        .par_iter()
        .fold(
            || ClassifiedReads::with_capacity(256),
            |mut acc, dna| {
                acc.push(Bucket::from_count(site.count_in_read(dna)), dna);
                acc
            },
        )
        .reduce(ClassifiedReads::default, ClassifiedReads::merge)
}
