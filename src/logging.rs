//src/logging.rs

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use env_logger::{Builder, Target};

use crate::error::Result;

/// `20240501_13.05.59_rt_nano.log`
pub fn log_file_name(at: DateTime<Local>) -> String {
    format!("{}_rt_nano.log", at.format("%Y%m%d_%H.%M.%S"))
}

/// Copies every log line to stdout and to the session log file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stdout().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stdout().flush()
    }
}

/// Create `result_dir` and a timestamped log file inside it, then route the
/// `log` macros to both that file and stdout, message only.
/// Level defaults to debug; `RUST_LOG` overrides it.
pub fn init_logging(result_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(result_dir)?;
    let log_path = result_dir.join(log_file_name(Local::now()));
    let file = File::create(&log_path)?;

    Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(Target::Pipe(Box::new(Tee { file })))
        .init();

    Ok(log_path)
}
