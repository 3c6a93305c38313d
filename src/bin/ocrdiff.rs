//! Command-line adapter over the comparison core.
//!
//! Thin by design: parse arguments, wire up the bundled engines, run the
//! comparison synchronously, print the event stream, and map the terminal
//! state to an exit code. Everything interesting happens in the library.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ocrdiff::compare::{CompareJob, ComparisonRunner, RunContext, RunOutcome, RunState};
use ocrdiff::config::CompareOptions;
use ocrdiff::ocr::OcrModelPaths;
use ocrdiff::{EventSink, LogEntry, Sensitivity, Severity};

#[derive(Parser, Debug)]
#[command(name = "ocrdiff")]
#[command(version)]
#[command(about = "Compares two PDF documents page by page via OCR and highlights changed words.")]
struct Cli {
    /// The original document
    original: PathBuf,

    /// The modified document
    modified: PathBuf,

    /// Directory receiving page diffs and the report (created if absent)
    #[arg(short, long, default_value = "comparison_results")]
    output_dir: PathBuf,

    /// Comparison sensitivity in [0.5, 1.0]; higher is stricter
    #[arg(short, long, default_value_t = 0.75)]
    sensitivity: f64,

    /// JSON file overriding comparison options (dpi, highlight, jpeg quality)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path of the rten text-detection model
    #[arg(long)]
    detection_model: Option<PathBuf>,

    /// Path of the rten text-recognition model
    #[arg(long)]
    recognition_model: Option<PathBuf>,

    /// Also print progress percentages and time estimates
    #[arg(short, long)]
    verbose: bool,
}

/// Prints run events to stdout as they arrive.
struct ConsoleSink {
    verbose: bool,
}

impl EventSink for ConsoleSink {
    fn on_progress(&mut self, percent: f32) {
        if self.verbose {
            println!("  {percent:.0}%");
        }
    }

    fn on_status(&mut self, message: &str) {
        println!("{message}");
    }

    fn on_time_estimate(&mut self, estimate: &str) {
        if self.verbose {
            println!("  {estimate}");
        }
    }

    fn on_log(&mut self, entry: &LogEntry) {
        let tag = match entry.severity {
            Severity::Success => "ok",
            Severity::Warning => "warn",
            Severity::Error => "error",
            Severity::Info | Severity::None => "info",
        };
        println!("[{}] {:>5}: {}", entry.timestamp, tag, entry.message);
    }
}

fn load_options(path: Option<&PathBuf>) -> Result<CompareOptions, String> {
    let Some(path) = path else {
        return Ok(CompareOptions::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config '{}': {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid config '{}': {e}", path.display()))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let sensitivity = match Sensitivity::try_new(cli.sensitivity) {
        Ok(sensitivity) => sensitivity,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let options = match load_options(cli.config.as_ref()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    let models = match OcrModelPaths::resolve(cli.detection_model, cli.recognition_model) {
        Ok(models) => models,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let runner = match ComparisonRunner::with_default_engines(options, &models) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let job = CompareJob {
        original: cli.original,
        modified: cli.modified,
        output_dir: cli.output_dir,
        sensitivity,
    };
    let mut ctx = RunContext::new(ConsoleSink {
        verbose: cli.verbose,
    });
    let summary = runner.run(&job, &mut ctx);

    match summary.state {
        RunState::Done(RunOutcome::Success) => {
            if let Some(report) = &summary.report {
                println!("Report: {}", report.display());
            } else {
                println!("No differences found; no report written.");
            }
            ExitCode::SUCCESS
        }
        RunState::Cancelled => {
            println!("Cancelled.");
            ExitCode::FAILURE
        }
        _ => ExitCode::FAILURE,
    }
}
