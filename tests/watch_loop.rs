use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use nanoranger_rs::amplicon::AmpliconExtractor;
use nanoranger_rs::fastq::{read_fastq_records, write_fastq_records};
use nanoranger_rs::motif::CuttingSite;
use nanoranger_rs::pipeline::{AmpliconPipeline, FilePipeline};
use nanoranger_rs::watch::{Clock, StopSignal, WatchLoop, WatchState};
use nanoranger_rs::{FileSummaryRow, NanoRangerError, Result};

/// Keeps reads that start with the forward primer; can be switched off to
/// mimic a broken external tool.
#[derive(Clone)]
struct FakeSeqkit {
    forward: &'static str,
    healthy: Rc<Cell<bool>>,
}

impl AmpliconExtractor for FakeSeqkit {
    fn extract(&self, input: &Path, output: &Path) -> Result<()> {
        if !self.healthy.get() {
            return Err(NanoRangerError::Io(std::io::Error::other("seqkit crashed")));
        }
        let reads = read_fastq_records(input)?;
        write_fastq_records(output, reads.iter().filter(|r| r.seq.starts_with(self.forward)))?;
        Ok(())
    }
}

/// Runs a scripted action at each wait and stops after the last one.
struct ScriptedClock {
    waits: Rc<Cell<usize>>,
    script: Vec<Box<dyn FnMut()>>,
}

impl Clock for ScriptedClock {
    fn wait(&mut self, interval: Duration, stop: &StopSignal) {
        assert_eq!(interval, Duration::from_secs(10));
        let n = self.waits.get();
        self.waits.set(n + 1);
        match self.script.get_mut(n) {
            Some(action) => action(),
            None => stop.stop(),
        }
    }
}

/// Counts calls per path, records nothing.
struct CountingPipeline {
    calls: RefCell<Vec<PathBuf>>,
}

impl FilePipeline for CountingPipeline {
    fn process(&self, path: &Path) -> Result<FileSummaryRow> {
        self.calls.borrow_mut().push(path.to_path_buf());
        Ok(FileSummaryRow {
            path: path.to_path_buf(),
            total_reads: 0,
            with_sites: 0,
            one: 0,
            one_or_two: 0,
            three_plus: 0,
        })
    }
}

fn noop() -> Box<dyn FnMut()> {
    Box::new(|| {})
}

fn write_reads(path: &Path, seqs: &[&str]) {
    let mut text = String::new();
    for (i, seq) in seqs.iter().enumerate() {
        text.push_str(&format!("@read_{i}\n{seq}\n+\n{}\n", "#".repeat(seq.len())));
    }
    fs::write(path, text).unwrap();
}

#[test]
fn empty_directory_keeps_polling() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = CountingPipeline { calls: RefCell::new(Vec::new()) };
    let waits = Rc::new(Cell::new(0));
    let clock = ScriptedClock {
        waits: waits.clone(),
        script: vec![noop(), noop()],
    };
    let mut watcher = WatchLoop::new(dir.path(), "fastq", Duration::from_secs(10), pipeline, clock);
    watcher.run();

    assert_eq!(waits.get(), 3);
    assert_eq!(watcher.state(), WatchState::Idle);
    assert!(watcher.session().tracker().is_empty());
}

#[test]
fn empty_tick_reports_heartbeat() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = WatchLoop::new(
        dir.path(),
        "fastq",
        Duration::from_secs(10),
        CountingPipeline { calls: RefCell::new(Vec::new()) },
        ScriptedClock { waits: Rc::new(Cell::new(0)), script: Vec::new() },
    );

    let report = watcher.tick();
    assert_eq!(report.discovered, 0);
    assert!(report.heartbeat);
    assert!(!report.interrupted);
    assert_eq!(watcher.state(), WatchState::Idle);
}

#[test]
fn files_are_dispatched_once_even_if_still_present() {
    let dir = tempfile::tempdir().unwrap();
    write_reads(&dir.path().join("a.fastq"), &["ACGT"]);

    let pipeline = CountingPipeline { calls: RefCell::new(Vec::new()) };
    let mut watcher = WatchLoop::new(
        dir.path(),
        "fastq",
        Duration::from_secs(10),
        pipeline,
        ScriptedClock { waits: Rc::new(Cell::new(0)), script: Vec::new() },
    );

    let first = watcher.tick();
    assert_eq!(first.new_files, 1);
    assert!(!first.heartbeat);
    write_reads(&dir.path().join("b.fastq"), &["ACGT"]);
    let second = watcher.tick();
    assert_eq!(second.discovered, 2);
    assert_eq!(second.processed, [dir.path().join("b.fastq")]);
    let third = watcher.tick();
    assert_eq!(third.new_files, 0);
    assert_eq!(third.discovered, 2);
    assert!(third.heartbeat);

    assert_eq!(watcher.session().processed_count(), 2);
    assert_eq!(watcher.session().tracker().len(), 2);
    assert_eq!(
        *watcher.pipeline().calls.borrow(),
        [dir.path().join("a.fastq"), dir.path().join("b.fastq")]
    );
}

#[test]
fn stop_is_honoured_between_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.fastq", "b.fastq"] {
        write_reads(&dir.path().join(name), &["ACGT"]);
    }
    let pipeline = CountingPipeline { calls: RefCell::new(Vec::new()) };
    let mut watcher = WatchLoop::new(
        dir.path(),
        "fastq",
        Duration::from_secs(10),
        pipeline,
        ScriptedClock { waits: Rc::new(Cell::new(0)), script: Vec::new() },
    );
    watcher.stop_signal().stop();

    let report = watcher.tick();
    assert!(report.interrupted);
    assert!(report.processed.is_empty());
    assert_eq!(watcher.session().processed_count(), 0);
    assert!(watcher.pipeline().calls.borrow().is_empty());
}

/// Raises the loop's stop flag while it is busy with `a.fastq`, like a
/// Ctrl+C arriving mid-file.
struct StopDuringFirstFile {
    stop: RefCell<Option<StopSignal>>,
    calls: RefCell<Vec<PathBuf>>,
}

impl FilePipeline for StopDuringFirstFile {
    fn process(&self, path: &Path) -> Result<FileSummaryRow> {
        self.calls.borrow_mut().push(path.to_path_buf());
        if path.ends_with("a.fastq") {
            if let Some(stop) = self.stop.borrow().as_ref() {
                stop.stop();
            }
        }
        Ok(FileSummaryRow {
            path: path.to_path_buf(),
            total_reads: 1,
            with_sites: 1,
            one: 1,
            one_or_two: 1,
            three_plus: 0,
        })
    }
}

#[test]
fn stop_during_a_file_finishes_it_and_skips_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.fastq", "b.fastq"] {
        write_reads(&dir.path().join(name), &["ACGT"]);
    }
    let pipeline = StopDuringFirstFile {
        stop: RefCell::new(None),
        calls: RefCell::new(Vec::new()),
    };
    let waits = Rc::new(Cell::new(0));
    let mut watcher = WatchLoop::new(
        dir.path(),
        "fastq",
        Duration::from_secs(10),
        pipeline,
        ScriptedClock { waits: waits.clone(), script: Vec::new() },
    );
    *watcher.pipeline().stop.borrow_mut() = Some(watcher.stop_signal());

    let report = watcher.tick();
    assert_eq!(report.new_files, 2);
    assert_eq!(report.processed, [dir.path().join("a.fastq")]);
    assert!(report.failed.is_empty());
    assert!(report.interrupted);
    assert!(!report.heartbeat);
    assert_eq!(*watcher.pipeline().calls.borrow(), [dir.path().join("a.fastq")]);

    // the file in flight was recorded, the next one was never touched
    assert!(watcher.session().is_processed(&dir.path().join("a.fastq")));
    assert!(!watcher.session().is_processed(&dir.path().join("b.fastq")));
    assert_eq!(watcher.session().tracker().len(), 1);

    // run() sees the raised flag and returns without waiting
    watcher.run();
    assert_eq!(waits.get(), 0);
    assert_eq!(watcher.pipeline().calls.borrow().len(), 1);
}

#[test]
fn failed_file_is_retried_and_summarised_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("run");
    let results = dir.path().join("results");
    fs::create_dir(&input).unwrap();

    let batch0 = input.join("batch_0.fastq");
    write_reads(
        &batch0,
        &[
            "GGAAACTGCAGAAACTGCAGAAA",  // two
            "GGCTGCAGTT",               // one
            "GGTTTTTTTT",               // none
            "GGCTGCAGCTGCAGCTGCAGTT",   // three
            "TTCTGCAGTT",               // no primer
        ],
    );

    let healthy = Rc::new(Cell::new(false));
    let extractor = FakeSeqkit { forward: "GG", healthy: healthy.clone() };
    let pipeline = AmpliconPipeline::new(&results, CuttingSite::new("CTGCAG").unwrap(), extractor);

    let waits = Rc::new(Cell::new(0));
    let heal = healthy.clone();
    let batch1 = input.join("batch_1.fastq");
    let batch1_path = batch1.clone();
    let clock = ScriptedClock {
        waits: waits.clone(),
        script: vec![
            // tick 2: tool is back, batch_0 retried
            Box::new(move || heal.set(true)) as Box<dyn FnMut()>,
            // tick 3: a second file shows up
            Box::new(move || write_reads(&batch1_path, &["GGCTGCAG", "GGCTGCAG"])) as Box<dyn FnMut()>,
        ],
    };

    let mut watcher = WatchLoop::new(&input, "fastq", Duration::from_secs(10), pipeline, clock);
    watcher.run();

    let session = watcher.into_session();
    assert_eq!(session.processed_count(), 2);
    assert!(session.is_processed(&batch0));
    assert!(session.is_processed(&batch1));
    assert_eq!(
        session.tracker().rows(),
        [
            FileSummaryRow {
                path: batch0.clone(),
                total_reads: 4,
                with_sites: 3,
                one: 1,
                one_or_two: 2,
                three_plus: 1,
            },
            FileSummaryRow {
                path: batch1.clone(),
                total_reads: 2,
                with_sites: 2,
                one: 2,
                one_or_two: 2,
                three_plus: 0,
            },
        ]
    );
    // the results folder sits outside the watched folder and holds one set per file
    assert!(results.join("batch_0.fastq").join("three_or_more_cutting_sites.fastq").is_file());
    assert!(results.join("batch_1.fastq").join("one_cutting_site.fastq").is_file());
    assert!(session.tracker().render().contains("batch_1.fastq"));
}
