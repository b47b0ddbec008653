use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use nanoranger_rs::amplicon::check_tool;
use nanoranger_rs::cli::Args;
use nanoranger_rs::logging::init_logging;
use nanoranger_rs::pipeline::FilePipeline;
use nanoranger_rs::{seqkit_pipeline, watch_loop, FileSummaryRow, Result};

/// Shows a spinner on the terminal while the wrapped pipeline runs.
struct Spinning<P>(P);

impl<P: FilePipeline> FilePipeline for Spinning<P> {
    fn process(&self, path: &Path) -> Result<FileSummaryRow> {
        let spinner = ProgressBar::new_spinner();
        if !std::io::stderr().is_terminal() {
            spinner.set_draw_target(ProgressDrawTarget::hidden());
        }
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&[
                    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
                ])
                .template("{spinner:.green} {msg}")
                .expect("Invalid spinner template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message(format!("Classifying {}...", path.display()));

        let result = self.0.process(path);
        spinner.finish_and_clear();
        result
    }
}

fn main() {
    let args = Args::parse();

    // 1. Configuration errors end the run before anything is written
    let config = args.into_config().unwrap_or_else(|e| {
        eprintln!("ERROR!  {}", e);
        std::process::exit(1);
    });

    // 2. Log file + console
    let log_path = init_logging(&config.result_dir).unwrap_or_else(|e| {
        eprintln!("ERROR!  cannot set up logging in {}: {}", config.result_dir.display(), e);
        std::process::exit(1);
    });
    log::info!("Logging to {}", log_path.display());
    for warning in &config.warnings {
        log::warn!("{}", warning);
    }

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
    {
        log::warn!("Could not size the thread pool: {}", e);
    }

    let seqkit = config.seqkit.to_string_lossy();
    if !check_tool(&seqkit) {
        log::warn!("{} not found, amplicon extraction will fail until it is installed", seqkit);
    }

    // 3. Watch until Ctrl+C
    let mut watcher = watch_loop(&config, Spinning(seqkit_pipeline(&config)));
    let stop = watcher.stop_signal();
    if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
        log::warn!("Could not install the Ctrl+C handler: {}", e);
    }

    log::info!(
        "Watching {} every {}s for *.{} files, cutting site {}",
        config.input_dir.display(),
        config.poll_interval.as_secs(),
        config.extension,
        config.cutting_site
    );
    watcher.run();
}
