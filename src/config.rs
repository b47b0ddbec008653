//src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::demux::Demultiplexer;
use crate::error::{NanoRangerError, Result};
use crate::motif::{normalize_primer, CuttingSite};

/// Results land here, under the input directory, unless a save path is given.
pub const DEFAULT_RESULT_DIR: &str = "nanoranger_result";

/// Seconds between two directory scans.
pub const DEFAULT_POLL_SECS: u64 = 10;

pub const DEFAULT_EXTENSION: &str = "fastq";

/// Barcode kits the demultiplexer understands.
pub const BARCODE_KITS: &[&str] = &[
    "EXP-NBD103", "EXP-NBD104", "EXP-NBD114", "EXP-NBD196", "EXP-PBC001", "EXP-PBC096",
    "OND-SQK-LP0096M", "OND-SQK-LP0096S", "OND-SQK-LP1152S", "OND-SQK-LP9216",
    "SQK-16S024", "SQK-LWB001", "SQK-PBK004", "SQK-PCB109", "SQK-RAB201", "SQK-RAB204",
    "SQK-RBK001", "SQK-RBK004", "SQK-RBK096", "SQK-RLB001", "SQK-RPB004",
    "VSK-VMK001", "VSK-VMK002",
];

/// Fully validated settings for one monitoring session.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub result_dir: PathBuf,
    /// Matched against the file extension, without the dot
    pub extension: String,
    pub forward_primer: String,
    pub reverse_primer: String,
    pub cutting_site: CuttingSite,
    pub seqkit: PathBuf,
    pub demux: Option<Demultiplexer>,
    pub poll_interval: Duration,
    pub threads: usize,
    /// Time limit for one external tool run; `None` waits indefinitely
    pub tool_timeout: Option<Duration>,
    /// Non-fatal remarks found while validating; logged once logging is up
    pub warnings: Vec<String>,
}

/// `<input>/nanoranger_result` unless an explicit save path was given.
pub fn resolve_result_dir(input_dir: &Path, save_path: Option<&Path>) -> PathBuf {
    save_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_dir.join(DEFAULT_RESULT_DIR))
}

/// Split a space-separated kit list and check every entry against
/// [`BARCODE_KITS`].
pub fn parse_barcode_kits(raw: &str) -> Result<Vec<String>> {
    let kits: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if kits.is_empty() {
        return Err(NanoRangerError::config("Please provide -k/--barcode-kits"));
    }
    if let Some(bad) = kits.iter().find(|k| !BARCODE_KITS.contains(&k.as_str())) {
        return Err(NanoRangerError::config(format!(
            "-k/--barcode-kits '{bad}' is not in kit list:\n\n{}\n",
            BARCODE_KITS.join("\n")
        )));
    }
    Ok(kits)
}

/// Raw option values, before validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigInput {
    pub input_dir: PathBuf,
    pub save_path: Option<PathBuf>,
    pub primer1: String,
    pub primer2: String,
    pub cutting_site: String,
    pub guppy_barcoder: Option<PathBuf>,
    pub barcode_kits: Option<String>,
    pub extension: Option<String>,
    pub seqkit: Option<PathBuf>,
    pub poll_secs: Option<u64>,
    pub threads: Option<usize>,
    pub tool_timeout_secs: Option<u64>,
}

impl Config {
    /// Validate raw options. Every error here is a configuration error.
    pub fn from_input(input: ConfigInput) -> Result<Self> {
        if !input.input_dir.is_dir() {
            return Err(NanoRangerError::config(format!(
                "{} is not a directory",
                input.input_dir.display()
            )));
        }

        let forward_primer = normalize_primer(&input.primer1)?;
        let reverse_primer = normalize_primer(&input.primer2)?;
        let cutting_site = CuttingSite::new(&input.cutting_site)?;
        let threads = input.threads.unwrap_or_else(num_cpus::get).max(1);
        let mut warnings = Vec::new();

        let tool_timeout = match input.tool_timeout_secs {
            Some(0) => return Err(NanoRangerError::config("tool timeout must be at least one second")),
            secs => secs.map(Duration::from_secs),
        };

        let demux = match (input.guppy_barcoder, input.barcode_kits.as_deref()) {
            (Some(binary), Some(kits)) => {
                if !binary.exists() {
                    return Err(NanoRangerError::config(format!(
                        "{} does not exist",
                        binary.display()
                    )));
                }
                Some(Demultiplexer {
                    binary,
                    kits: parse_barcode_kits(kits)?,
                    threads,
                    timeout: tool_timeout,
                })
            }
            (Some(_), None) => {
                return Err(NanoRangerError::config("Please provide -k/--barcode-kits"))
            }
            (None, Some(_)) => {
                warnings.push("-k/--barcode-kits ignored without -g/--guppy-barcoder".to_string());
                None
            }
            (None, None) => None,
        };

        let extension = input
            .extension
            .as_deref()
            .unwrap_or(DEFAULT_EXTENSION)
            .trim_start_matches('.')
            .to_string();
        if extension.is_empty() {
            return Err(NanoRangerError::config("file extension is empty"));
        }

        let poll_secs = input.poll_secs.unwrap_or(DEFAULT_POLL_SECS);
        if poll_secs == 0 {
            return Err(NanoRangerError::config("poll interval must be at least one second"));
        }

        Ok(Config {
            result_dir: resolve_result_dir(&input.input_dir, input.save_path.as_deref()),
            input_dir: input.input_dir,
            extension,
            forward_primer,
            reverse_primer,
            cutting_site,
            seqkit: input.seqkit.unwrap_or_else(|| PathBuf::from("seqkit")),
            demux,
            poll_interval: Duration::from_secs(poll_secs),
            threads,
            tool_timeout,
            warnings,
        })
    }
}
