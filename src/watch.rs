//src/watch.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::pipeline::FilePipeline;
use crate::session::Session;

pub const HEARTBEAT: &str = "Monitoring for new files... (Press Ctrl+C to stop)";

/// Longest uninterrupted nap taken by [`SystemClock`].
const STOP_CHECK_SLICE: Duration = Duration::from_millis(200);

/// Shared flag asking the loop to stop at the next file boundary.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Waiting between two polls. Tests swap in a clock that does not sleep.
pub trait Clock {
    /// Wait for `interval`, returning early once `stop` is raised.
    fn wait(&mut self, interval: Duration, stop: &StopSignal);
}

/// Wall-clock waiting in short slices so a stop request is seen quickly.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn wait(&mut self, interval: Duration, stop: &StopSignal) {
        let mut left = interval;
        while !left.is_zero() && !stop.is_stopped() {
            let nap = left.min(STOP_CHECK_SLICE);
            thread::sleep(nap);
            left -= nap;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Scanning,
    Dispatching,
}

/// What happened during one poll tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub discovered: usize,
    pub new_files: usize,
    pub processed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    /// Stop was requested before every new file could be dispatched
    pub interrupted: bool,
    /// Nothing new was found and the "still monitoring" line was logged
    pub heartbeat: bool,
}

fn has_extension(name: &str, extension: &str) -> bool {
    name.len() > extension.len() + 1
        && name.ends_with(extension)
        && name[..name.len() - extension.len()].ends_with('.')
}

/// Whether `path` is a read file with the wanted extension, plain or gzipped.
/// An extension that already ends in `gz` is matched against the raw name.
pub fn matches_extension(path: &Path, extension: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    has_extension(name, extension)
        || name
            .strip_suffix(".gz")
            .is_some_and(|plain| has_extension(plain, extension))
}

/// Non-recursive listing of matching files, sorted by path.
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && matches_extension(&path, extension)).then_some(path)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Poll, find unseen files, run each through the pipeline, repeat.
pub struct WatchLoop<P, C> {
    input_dir: PathBuf,
    extension: String,
    interval: Duration,
    pipeline: P,
    clock: C,
    stop: StopSignal,
    session: Session,
    state: WatchState,
}

impl<P: FilePipeline, C: Clock> WatchLoop<P, C> {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        extension: &str,
        interval: Duration,
        pipeline: P,
        clock: C,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            extension: extension.to_string(),
            interval,
            pipeline,
            clock,
            stop: StopSignal::new(),
            session: Session::new(),
            state: WatchState::Idle,
        }
    }

    /// Handle for requesting a stop from elsewhere (signal handler, tests).
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// One scan + dispatch cycle. Ends back in `Idle`.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        self.state = WatchState::Scanning;
        let discovered = match discover_files(&self.input_dir, &self.extension) {
            Ok(files) => files,
            Err(e) => {
                log::error!("Cannot list {}: {}", self.input_dir.display(), e);
                self.state = WatchState::Idle;
                return report;
            }
        };
        report.discovered = discovered.len();
        let new_files = self.session.new_files(discovered);
        report.new_files = new_files.len();

        self.state = WatchState::Dispatching;
        for path in new_files {
            if self.stop.is_stopped() {
                report.interrupted = true;
                break;
            }
            log::info!("Processing {}", path.display());
            match self.pipeline.process(&path) {
                Ok(row) => {
                    if self.session.complete(&path, row) {
                        log::info!("\n{}", self.session.tracker().render());
                    }
                    report.processed.push(path);
                }
                Err(e) => {
                    let attempts = self.session.record_failure(&path);
                    log::error!(
                        "Error processing file {} (attempt {}): {}",
                        path.display(),
                        attempts,
                        e
                    );
                    report.failed.push(path);
                }
            }
        }

        if report.new_files == 0 {
            log::info!("{}", HEARTBEAT);
            report.heartbeat = true;
        }
        self.state = WatchState::Idle;
        report
    }

    /// Tick, wait, tick... until a stop is requested.
    pub fn run(&mut self) {
        while !self.stop.is_stopped() {
            self.tick();
            if self.stop.is_stopped() {
                break;
            }
            self.clock.wait(self.interval, &self.stop);
        }
        log::info!(
            "Stopped after processing {} file(s)",
            self.session.processed_count()
        );
    }
}
