//src/error.rs

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Every failure the monitor can run into.
///
/// Configuration errors abort before the watch loop starts; everything else
/// is caught at the single-file boundary and the file is retried later.
#[derive(Debug, Error)]
pub enum NanoRangerError {
    /// Missing or inconsistent option, unknown barcode kit, missing file
    #[error("{0}")]
    Config(String),

    /// A primer or cutting-site sequence with symbols outside its alphabet
    #[error("invalid {kind} sequence '{sequence}': unexpected symbol '{symbol}'")]
    InvalidSequence {
        kind: &'static str,
        sequence: String,
        symbol: char,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Truncated or malformed 4-line record
    #[error("malformed fastq record in {path}: {reason}")]
    Fastq { path: PathBuf, reason: String },

    /// The external tool ran but reported failure
    #[error("{tool} exited with {status}: {stderr}")]
    Tool {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The external tool outlived its time limit and was killed
    #[error("{tool} killed after running longer than {after:?}")]
    Timeout { tool: String, after: Duration },

    /// Internal consistency check failed
    #[error("internal error: {0}")]
    Invariant(String),

    /// The external tool could not be started at all
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

impl NanoRangerError {
    pub fn config(msg: impl Into<String>) -> Self {
        NanoRangerError::Config(msg.into())
    }

    /// Configuration errors are fatal, the rest are per-file.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            NanoRangerError::Config(_) | NanoRangerError::InvalidSequence { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NanoRangerError>;
