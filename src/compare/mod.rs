//! Comparison orchestration.
//!
//! Drives the full pipeline over a document pair: rasterize both documents,
//! extract and diff tokens page by page, highlight and save changed pages,
//! then assemble the report. The run is an explicit state machine
//! (`Idle -> Rasterizing -> ComparingPages -> (Cancelled | Reporting) ->
//! Done`), emits progress/status/time events through an [`EventSink`], keeps
//! an ordered run log, and honors cooperative cancellation at page
//! boundaries. Every error is absorbed at the [`ComparisonRunner::run`]
//! boundary and reported through the event channel; `run` never panics or
//! returns `Err`.

pub mod events;

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use crate::config::{CompareOptions, Sensitivity};
use crate::diff::changed_indices;
use crate::error::{Error, Result};
use crate::highlight::highlight_changes;
use crate::ocr::{OcrModelPaths, OcrsExtractor, TokenExtractor};
use crate::rasterize::{PageRasterizer, PdfiumRasterizer};
use crate::report::assemble_report;

use events::{CancelFlag, EventSink, LogEntry, Severity};

/// File name of the assembled report inside the output directory.
pub const REPORT_FILE_NAME: &str = "comparison_report.pdf";

/// The per-run inputs of one comparison.
#[derive(Debug, Clone)]
pub struct CompareJob {
    /// Path of the original document
    pub original: PathBuf,
    /// Path of the modified document
    pub modified: PathBuf,
    /// Directory receiving page diffs and the report; created if absent
    pub output_dir: PathBuf,
    /// Similarity cutoff applied to every token pair in this run
    pub sensitivity: Sensitivity,
}

/// Diff artifact file name for a 1-based page number.
pub fn artifact_file_name(page: usize) -> String {
    format!("page_{page}_diff.png")
}

/// Phase of a comparison run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    /// No run started yet
    Idle,
    /// Converting both documents to page images
    Rasterizing,
    /// Comparing page `current` of `total`
    ComparingPages {
        /// 1-based page being compared
        current: usize,
        /// Number of page pairs in this run
        total: usize,
    },
    /// Assembling the report from the page diffs
    Reporting,
    /// The run was cancelled at a page boundary
    Cancelled,
    /// The run finished
    Done(RunOutcome),
}

/// How a finished run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The comparison ran to completion
    Success,
    /// The run was aborted by the contained error message
    Failed(String),
}

impl RunState {
    /// Whether this state permits a transition to `next`.
    pub fn may_transition_to(&self, next: &RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Idle, Rasterizing) => true,
            (Rasterizing, ComparingPages { .. }) => true,
            (Rasterizing, Cancelled) => true,
            (Rasterizing, Done(RunOutcome::Failed(_))) => true,
            (ComparingPages { .. }, ComparingPages { .. }) => true,
            (ComparingPages { .. }, Cancelled) => true,
            (ComparingPages { .. }, Reporting) => true,
            (ComparingPages { .. }, Done(_)) => true,
            (Reporting, Done(_)) => true,
            _ => false,
        }
    }

    /// Whether the run is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Cancelled | RunState::Done(_))
    }
}

/// Tracks the current state and enforces the transition table in debug builds.
struct StateTracker {
    state: RunState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.may_transition_to(&next),
            "illegal run state transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}

/// Per-run shared context: the cancellation signal and the event sink.
///
/// Replaces ad hoc shared flags with one object passed into the runner. The
/// run log accumulates here and is handed over in the [`RunSummary`]; it is
/// reset at the start of the next run.
pub struct RunContext<S: EventSink> {
    /// Cooperative cancellation flag; the caller keeps a clone
    pub cancel: CancelFlag,
    sink: S,
    log: Vec<LogEntry>,
}

impl<S: EventSink> RunContext<S> {
    /// Create a context with a fresh cancellation flag.
    pub fn new(sink: S) -> Self {
        Self::with_cancel(sink, CancelFlag::new())
    }

    /// Create a context observing an existing cancellation flag.
    pub fn with_cancel(sink: S, cancel: CancelFlag) -> Self {
        Self {
            cancel,
            sink,
            log: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.log.clear();
        self.cancel.reset();
    }

    fn progress(&mut self, percent: f32) {
        self.sink.on_progress(percent);
    }

    fn status(&mut self, message: &str) {
        self.sink.on_status(message);
    }

    fn time_estimate(&mut self, estimate: &str) {
        self.sink.on_time_estimate(estimate);
    }

    fn record(&mut self, message: String, severity: Severity) {
        let entry = LogEntry::new(message, severity);
        self.sink.on_log(&entry);
        self.log.push(entry);
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Terminal state of the run
    pub state: RunState,
    /// Number of page pairs fully processed
    pub pages_compared: usize,
    /// Diff images written, ascending by page number
    pub artifacts: Vec<PathBuf>,
    /// Report path, present iff at least one page had changes
    pub report: Option<PathBuf>,
    /// Ordered run log
    pub log: Vec<LogEntry>,
    /// The absorbing error when the run failed
    pub error: Option<Error>,
}

impl RunSummary {
    /// Whether the run completed successfully.
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Done(RunOutcome::Success)
    }
}

/// Drives comparisons over pluggable rasterization and OCR backends.
pub struct ComparisonRunner<R, X> {
    rasterizer: R,
    extractor: X,
    options: CompareOptions,
}

impl<R: PageRasterizer, X: TokenExtractor> ComparisonRunner<R, X> {
    /// Create a runner from its collaborators.
    pub fn new(rasterizer: R, extractor: X, options: CompareOptions) -> Self {
        Self {
            rasterizer,
            extractor,
            options,
        }
    }

    /// The options this runner applies to every run.
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Execute one comparison run.
    ///
    /// Synchronous; callers that need a responsive interface run it through
    /// [`spawn_comparison`]. Never returns an error: failures end in
    /// `Done(Failed)` with progress zeroed, an error status, and an error log
    /// entry, and the typed error is carried in the summary.
    pub fn run<S: EventSink>(&self, job: &CompareJob, ctx: &mut RunContext<S>) -> RunSummary {
        ctx.reset();
        let mut tracker = StateTracker::new();
        let mut accum = Accum::default();

        let result = self.execute(job, ctx, &mut tracker, &mut accum);
        let (state, error) = match result {
            Ok(()) => (RunState::Done(RunOutcome::Success), None),
            Err(Error::Cancelled) => {
                ctx.progress(0.0);
                ctx.status("Comparison cancelled");
                (RunState::Cancelled, None)
            }
            Err(err) => {
                let message = err.to_string();
                log::warn!("comparison failed: {message}");
                ctx.progress(0.0);
                ctx.status(&format!("Error: {message}"));
                ctx.record(format!("Error during comparison: {message}"), Severity::Error);
                (RunState::Done(RunOutcome::Failed(message)), Some(err))
            }
        };
        tracker.advance(state.clone());

        RunSummary {
            state,
            pages_compared: accum.pages_compared,
            artifacts: accum.artifacts,
            report: accum.report,
            log: std::mem::take(&mut ctx.log),
            error,
        }
    }

    fn execute<S: EventSink>(
        &self,
        job: &CompareJob,
        ctx: &mut RunContext<S>,
        tracker: &mut StateTracker,
        accum: &mut Accum,
    ) -> Result<()> {
        tracker.advance(RunState::Rasterizing);
        ctx.progress(5.0);
        ctx.status("Converting documents to images...");
        fs::create_dir_all(&job.output_dir)?;

        let original_pages = self.rasterizer.rasterize(&job.original)?;
        let modified_pages = self.rasterizer.rasterize(&job.modified)?;

        // Trailing pages of the longer document are silently ignored
        let total = original_pages.len().min(modified_pages.len());
        if total == 0 {
            return Err(Error::EmptyDocument);
        }
        ctx.record(format!("Processing {total} page comparisons..."), Severity::Info);

        let start = Instant::now();
        for (index, (original, modified)) in
            original_pages.iter().zip(modified_pages.iter()).enumerate()
        {
            if ctx.cancel.is_cancelled() {
                ctx.record("Comparison cancelled by user".to_string(), Severity::Warning);
                return Err(Error::Cancelled);
            }
            let page = index + 1;
            tracker.advance(RunState::ComparingPages {
                current: page,
                total,
            });
            let progress = 10.0 + index as f32 * 80.0 / total as f32;
            ctx.progress(progress);
            ctx.status(&format!("Comparing page {page}/{total}..."));

            let original_tokens = self.extractor.extract(original)?;
            let modified_tokens = self.extractor.extract(modified)?;
            let changed = changed_indices(&original_tokens, &modified_tokens, job.sensitivity);

            if changed.is_empty() {
                ctx.record(format!("Page {page}: No differences found"), Severity::Info);
            } else {
                let highlighted =
                    highlight_changes(modified, &modified_tokens, &changed, &self.options.highlight);
                let path = job.output_dir.join(artifact_file_name(page));
                highlighted
                    .save(&path)
                    .map_err(|e| Error::Image(e.to_string()))?;
                ctx.record(
                    format!(
                        "Page {page}: Found {} differences -> {}",
                        changed.len(),
                        path.display()
                    ),
                    Severity::Success,
                );
                accum.artifacts.push(path);
            }
            accum.pages_compared = page;

            let elapsed = start.elapsed().as_secs_f64();
            if progress > 5.0 {
                let estimated_total = elapsed / (progress as f64 / 100.0);
                let remaining = (estimated_total - elapsed).max(0.0);
                ctx.time_estimate(&format_time_estimate(remaining));
            }
        }

        if !accum.artifacts.is_empty() {
            tracker.advance(RunState::Reporting);
            ctx.progress(95.0);
            ctx.status("Generating final report...");
            let path = job.output_dir.join(REPORT_FILE_NAME);
            assemble_report(&accum.artifacts, &path, self.options.report_jpeg_quality)?;
            ctx.record(format!("Final report generated: {}", path.display()), Severity::Success);
            accum.report = Some(path);
        }

        ctx.progress(100.0);
        ctx.status("Comparison complete!");
        ctx.record(
            "Document comparison finished successfully".to_string(),
            Severity::Success,
        );
        Ok(())
    }
}

impl ComparisonRunner<PdfiumRasterizer, OcrsExtractor> {
    /// Wire up the bundled pdfium rasterizer and ocrs extractor.
    pub fn with_default_engines(options: CompareOptions, models: &OcrModelPaths) -> Result<Self> {
        let rasterizer = PdfiumRasterizer::new(options.dpi)?;
        let extractor = OcrsExtractor::new(models)?;
        Ok(Self::new(rasterizer, extractor, options))
    }
}

#[derive(Default)]
struct Accum {
    pages_compared: usize,
    artifacts: Vec<PathBuf>,
    report: Option<PathBuf>,
}

/// Run a comparison on a dedicated worker thread.
///
/// The caller keeps a clone of the context's [`CancelFlag`] and, typically, a
/// [`events::ChannelSink`] receiver to poll for events while the worker runs.
pub fn spawn_comparison<R, X, S>(
    runner: ComparisonRunner<R, X>,
    job: CompareJob,
    mut ctx: RunContext<S>,
) -> thread::JoinHandle<RunSummary>
where
    R: PageRasterizer + Send + 'static,
    X: TokenExtractor + Send + 'static,
    S: EventSink + 'static,
{
    thread::spawn(move || runner.run(&job, &mut ctx))
}

/// Format a remaining-seconds projection the way the status line expects.
fn format_time_estimate(remaining_seconds: f64) -> String {
    if remaining_seconds > 60.0 {
        let minutes = (remaining_seconds / 60.0) as u64;
        let seconds = (remaining_seconds % 60.0) as u64;
        format!("Estimated time remaining: {minutes}m {seconds}s")
    } else {
        format!("Estimated time remaining: {}s", remaining_seconds as u64)
    }
}
