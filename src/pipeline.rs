//src/pipeline.rs

use ahash::AHashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::amplicon::AmpliconExtractor;
use crate::classify::classify_reads_parallel;
use crate::demux::Demultiplexer;
use crate::error::{NanoRangerError, Result};
use crate::fastq::{read_fastq_records, write_fastq_records};
use crate::motif::CuttingSite;
use crate::types::{DNASequence, FileSummaryRow};

// Intermediate file names, one set per processed input file
pub const MERGED: &str = "merged.fastq";
pub const EXTRACTED: &str = "extracted.fastq";
pub const WITH_SITES: &str = "contains_cutting_sites.fastq";
pub const ONE_SITE: &str = "one_cutting_site.fastq";
pub const TWO_SITES: &str = "two_cutting_sites.fastq";
pub const ONE_OR_TWO_SITES: &str = "one_or_two_cutting_sites.fastq";
pub const THREE_PLUS_SITES: &str = "three_or_more_cutting_sites.fastq";

/// Turns one input file into one summary row.
pub trait FilePipeline {
    fn process(&self, path: &Path) -> Result<FileSummaryRow>;
}

/// Folder under `result_dir` holding the intermediate files of `input`,
/// named after the whole file name so `x.fastq` and `x.fastq.gz` never share one.
/// `reads_07.fastq.gz` -> `<result_dir>/reads_07.fastq.gz`
pub fn work_dir_for(result_dir: &Path, input: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) => result_dir.join(name),
        None => result_dir.join("reads"),
    }
}

/// Keep the first read for each identifier.
pub fn unique_reads(reads: Vec<DNASequence>) -> Vec<DNASequence> {
    let mut seen = AHashSet::with_capacity(reads.len());
    let before = reads.len();
    let unique: Vec<_> = reads
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    if unique.len() != before {
        log::debug!("Dropped {} duplicate read(s)", before - unique.len());
    }
    unique
}

/// Demultiplex (optional) -> merge -> extract amplicons -> count sites -> bucket.
pub struct AmpliconPipeline<E> {
    pub result_dir: PathBuf,
    pub cutting_site: CuttingSite,
    pub extractor: E,
    pub demux: Option<Demultiplexer>,
}

impl<E: AmpliconExtractor> AmpliconPipeline<E> {
    pub fn new(result_dir: impl Into<PathBuf>, cutting_site: CuttingSite, extractor: E) -> Self {
        Self {
            result_dir: result_dir.into(),
            cutting_site,
            extractor,
            demux: None,
        }
    }

    pub fn with_demux(mut self, demux: Option<Demultiplexer>) -> Self {
        self.demux = demux;
        self
    }

    /// Write the reads that go into amplicon extraction to `merged`.
    fn merge_input(&self, input: &Path, work_dir: &Path, merged: &Path) -> Result<usize> {
        let sources = match &self.demux {
            Some(demux) => demux.run(input, work_dir)?,
            None => vec![input.to_path_buf()],
        };
        let mut reads = Vec::new();
        for source in &sources {
            reads.extend(read_fastq_records(source)?);
        }
        write_fastq_records(merged, &reads)
    }
}

impl<E: AmpliconExtractor> FilePipeline for AmpliconPipeline<E> {
    fn process(&self, path: &Path) -> Result<FileSummaryRow> {
        let work_dir = work_dir_for(&self.result_dir, path);
        fs::create_dir_all(&work_dir)?;

        let merged = work_dir.join(MERGED);
        let n_merged = self.merge_input(path, &work_dir, &merged)?;
        log::debug!("{}: {} read(s) merged", path.display(), n_merged);

        let extracted = work_dir.join(EXTRACTED);
        self.extractor.extract(&merged, &extracted)?;
        let amplicons = unique_reads(read_fastq_records(&extracted)?);

        let classified = classify_reads_parallel(&self.cutting_site, &amplicons);
        write_fastq_records(work_dir.join(WITH_SITES), classified.with_sites())?;
        write_fastq_records(work_dir.join(ONE_SITE), classified.one.iter().copied())?;
        write_fastq_records(work_dir.join(TWO_SITES), classified.two.iter().copied())?;
        write_fastq_records(work_dir.join(ONE_OR_TWO_SITES), classified.one_or_two())?;
        write_fastq_records(
            work_dir.join(THREE_PLUS_SITES),
            classified.three_plus.iter().copied(),
        )?;

        let counts = classified.counts();
        if !counts.check_partition(path) {
            return Err(NanoRangerError::Invariant(format!(
                "bucket partition of {} does not add up",
                path.display()
            )));
        }
        log::debug!(
            "{}: {} amplicon(s), {} with '{}'",
            path.display(),
            counts.total_reads,
            counts.with_sites,
            self.cutting_site
        );
        Ok(counts.to_row(path))
    }
}
