//src/amplicon.rs

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{NanoRangerError, Result};

/// Primer-bounded amplicon extraction, file in, file out.
///
/// Implementations write to `output` only the reads carrying the forward and
/// reverse primer in the expected orientation. A read passes or it doesn't.
pub trait AmpliconExtractor {
    fn extract(&self, input: &Path, output: &Path) -> Result<()>;
}

/// How often a time-limited child is checked on.
const WAIT_SLICE: Duration = Duration::from_millis(100);

/// Runs a prepared command to completion, turning a non-zero exit into
/// `NanoRangerError::Tool` carrying the tool's stderr.
///
/// With a `timeout`, a child still running when it expires is killed and
/// `NanoRangerError::Timeout` is returned; without one the wait is unbounded.
pub(crate) fn run_command(tool: &str, cmd: &mut Command, timeout: Option<Duration>) -> Result<()> {
    log::debug!("Running {:?}", cmd);
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| NanoRangerError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    // drained on its own thread so a chatty tool never stalls on a full pipe
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let status = match timeout {
        None => child.wait()?,
        Some(limit) => {
            let started = Instant::now();
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if started.elapsed() >= limit {
                    if let Err(e) = child.kill() {
                        log::warn!("Could not kill {}: {}", tool, e);
                    }
                    let _ = child.wait();
                    return Err(NanoRangerError::Timeout {
                        tool: tool.to_string(),
                        after: limit,
                    });
                }
                thread::sleep(WAIT_SLICE.min(limit));
            }
        }
    };

    if !status.success() {
        let stderr = stderr_reader
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();
        return Err(NanoRangerError::Tool {
            tool: tool.to_string(),
            status,
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Whether `tool` is runnable: an existing path, or a name found on `PATH`.
pub fn check_tool(tool: &str) -> bool {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return direct.is_file();
    }
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(tool).is_file()))
        .unwrap_or(false)
}

/// `seqkit amplicon --strict-mode` backend.
#[derive(Debug, Clone)]
pub struct SeqkitAmplicon {
    pub binary: PathBuf,
    pub forward: String,
    pub reverse: String,
    pub strict: bool,
    pub threads: usize,
    /// Kill the tool if one extraction runs longer than this
    pub timeout: Option<Duration>,
}

impl SeqkitAmplicon {
    pub fn new(binary: impl Into<PathBuf>, forward: &str, reverse: &str, threads: usize) -> Self {
        Self {
            binary: binary.into(),
            forward: forward.to_string(),
            reverse: reverse.to_string(),
            strict: true,
            threads: threads.max(1),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("amplicon")
            .arg(input)
            .arg("--forward")
            .arg(&self.forward)
            .arg("--reverse")
            .arg(&self.reverse)
            .arg("--threads")
            .arg(self.threads.to_string())
            .arg("--out-file")
            .arg(output);
        if self.strict {
            cmd.arg("--strict-mode");
        }
        cmd
    }
}

impl AmpliconExtractor for SeqkitAmplicon {
    fn extract(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.command(input, output);
        run_command("seqkit amplicon", &mut cmd, self.timeout)
    }
}
