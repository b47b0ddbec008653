use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, ConfigInput, DEFAULT_EXTENSION, DEFAULT_POLL_SECS};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Real-time analysis of nanopore amplicon reads: counts cutting sites per read as new files arrive",
    long_about = None
)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "path",
        required = true,
        value_name = "PATH",
        help = "Path to the nanopore result folder to monitor"
    )]
    pub path: PathBuf,

    #[arg(
        short = 's',
        long = "save-path",
        value_name = "PATH",
        help = "Path to the results folder [default: nanoranger_result inside --path]"
    )]
    pub save_path: Option<PathBuf>,

    #[arg(long = "primer1", required = true, value_name = "SEQ", help = "Forward primer")]
    pub primer1: String,

    #[arg(long = "primer2", required = true, value_name = "SEQ", help = "Reverse primer")]
    pub primer2: String,

    #[arg(
        long = "cutting-site",
        required = true,
        value_name = "SEQ",
        help = "Cutting site sequence"
    )]
    pub cutting_site: String,

    #[arg(
        short = 'g',
        long = "guppy-barcoder",
        value_name = "PATH",
        help = "Path to guppy_barcoder; enables demultiplexing with --require_barcodes_both_ends --trim_barcodes"
    )]
    pub guppy_barcoder: Option<PathBuf>,

    #[arg(
        short = 'k',
        long = "barcode-kits",
        value_name = "KITS",
        help = "Space separated barcode kits, required with -g/--guppy-barcoder"
    )]
    pub barcode_kits: Option<String>,

    #[arg(
        long = "seqkit",
        value_name = "PATH",
        default_value = "seqkit",
        help = "seqkit binary used for amplicon extraction"
    )]
    pub seqkit: PathBuf,

    #[arg(
        long = "extension",
        value_name = "EXT",
        default_value = DEFAULT_EXTENSION,
        help = "Extension of the read files to pick up"
    )]
    pub extension: String,

    #[arg(
        long = "interval",
        value_name = "SECONDS",
        default_value_t = DEFAULT_POLL_SECS,
        help = "Seconds between two scans of --path"
    )]
    pub interval: u64,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,

    #[arg(
        long = "tool-timeout",
        value_name = "SECONDS",
        help = "Kill seqkit/guppy_barcoder if one run takes longer than this [default: no limit]"
    )]
    pub tool_timeout: Option<u64>,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        Config::from_input(ConfigInput {
            input_dir: self.path,
            save_path: self.save_path,
            primer1: self.primer1,
            primer2: self.primer2,
            cutting_site: self.cutting_site,
            guppy_barcoder: self.guppy_barcoder,
            barcode_kits: self.barcode_kits,
            extension: Some(self.extension),
            seqkit: Some(self.seqkit),
            poll_secs: Some(self.interval),
            threads: Some(self.threads),
            tool_timeout_secs: self.tool_timeout,
        })
    }
}
