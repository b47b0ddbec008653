//src/demux.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::amplicon::run_command;
use crate::error::Result;

/// Folder name the demultiplexer uses for reads it could not assign.
const UNCLASSIFIED_DIR: &str = "unclassified";

/// Optional barcode demultiplexing through an external `guppy_barcoder`.
#[derive(Debug, Clone)]
pub struct Demultiplexer {
    pub binary: PathBuf,
    pub kits: Vec<String>,
    pub threads: usize,
    /// Kill the tool if one run takes longer than this
    pub timeout: Option<Duration>,
}

impl Demultiplexer {
    fn command(&self, input_dir: &Path, save_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--input_path")
            .arg(input_dir)
            .arg("--save_path")
            .arg(save_dir)
            .arg("--barcode_kits")
            .arg(self.kits.join(" "))
            .arg("--worker_threads")
            .arg(self.threads.max(1).to_string())
            .arg("--require_barcodes_both_ends")
            .arg("--trim_barcodes");
        cmd
    }

    /// Demultiplex one read file inside `work_dir`.
    ///
    /// The file is staged alone into `work_dir/staged` so the tool sees only
    /// it. Returns the barcoded fastq files produced, sorted, without the
    /// unclassified bin.
    pub fn run(&self, input: &Path, work_dir: &Path) -> Result<Vec<PathBuf>> {
        let staged = work_dir.join("staged");
        let save = work_dir.join("demultiplexed");
        for dir in [&staged, &save] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
            fs::create_dir_all(dir)?;
        }
        if let Some(name) = input.file_name() {
            fs::copy(input, staged.join(name))?;
        }

        let mut cmd = self.command(&staged, &save);
        run_command("guppy_barcoder", &mut cmd, self.timeout)?;

        let mut outputs = Vec::new();
        collect_fastq(&save, &mut outputs)?;
        outputs.sort();
        log::debug!("Demultiplexing {} produced {} file(s)", input.display(), outputs.len());
        Ok(outputs)
    }
}

fn collect_fastq(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().map(|n| n == UNCLASSIFIED_DIR).unwrap_or(false) {
                continue;
            }
            collect_fastq(&path, out)?;
        } else if path.extension().map(|ext| ext == "fastq").unwrap_or(false) {
            out.push(path);
        }
    }
    Ok(())
}
