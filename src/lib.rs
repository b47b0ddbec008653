// src/lib.rs
pub mod types;
pub mod error;
pub mod fastq;
pub mod motif;
pub mod classify;
pub mod amplicon;
pub mod demux;
pub mod pipeline;
pub mod tracker;
pub mod session;
pub mod watch;
pub mod config;
pub mod cli;
pub mod logging;

use crate::amplicon::SeqkitAmplicon;
use crate::config::Config;
use crate::pipeline::AmpliconPipeline;
use crate::watch::{SystemClock, WatchLoop};

pub use crate::error::{NanoRangerError, Result};
pub use crate::types::{Bucket, DNASequence, FileSummaryRow};

/// The pipeline used for real runs: optional demultiplexing, then
/// `seqkit amplicon` extraction, then cutting-site bucketing.
pub fn seqkit_pipeline(config: &Config) -> AmpliconPipeline<SeqkitAmplicon> {
    let extractor = SeqkitAmplicon::new(
        &config.seqkit,
        &config.forward_primer,
        &config.reverse_primer,
        config.threads,
    )
    .with_timeout(config.tool_timeout);
    AmpliconPipeline::new(&config.result_dir, config.cutting_site.clone(), extractor)
        .with_demux(config.demux.clone())
}

/// Watch loop over `config.input_dir` driving `pipeline` on the wall clock.
pub fn watch_loop<P: pipeline::FilePipeline>(
    config: &Config,
    pipeline: P,
) -> WatchLoop<P, SystemClock> {
    WatchLoop::new(
        &config.input_dir,
        &config.extension,
        config.poll_interval,
        pipeline,
        SystemClock,
    )
}
