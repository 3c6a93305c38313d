//! # ocrdiff
//!
//! OCR-based page-by-page PDF comparison. Two documents are rendered to
//! images at a fixed DPI, their text is recognized per page, and every word
//! on the modified page with no sufficiently similar counterpart anywhere on
//! the original page is highlighted. Changed pages are written as PNG diffs
//! and collected into a single multi-page PDF report.
//!
//! ## Pipeline
//!
//! 1. Rasterize both documents ([`rasterize`])
//! 2. Per page pair: extract tokens ([`ocr`]), classify them ([`matching`],
//!    [`diff`]), render the overlay ([`highlight`])
//! 3. Assemble changed pages into the report ([`report`])
//! 4. All of it driven by the orchestrator ([`compare`]), which emits
//!    progress/status/time events, keeps a run log, and supports cooperative
//!    cancellation
//!
//! ## Quick Start
//!
//! ```ignore
//! use ocrdiff::compare::events::NullSink;
//! use ocrdiff::compare::{CompareJob, ComparisonRunner, RunContext};
//! use ocrdiff::config::{CompareOptions, Sensitivity};
//! use ocrdiff::ocr::OcrModelPaths;
//!
//! let models = OcrModelPaths::resolve(None, None)?;
//! let runner = ComparisonRunner::with_default_engines(CompareOptions::default(), &models)?;
//! let job = CompareJob {
//!     original: "original.pdf".into(),
//!     modified: "modified.pdf".into(),
//!     output_dir: "comparison_results".into(),
//!     sensitivity: Sensitivity::try_new(0.75)?,
//! };
//! let summary = runner.run(&job, &mut RunContext::new(NullSink));
//! for entry in &summary.log {
//!     println!("[{}] {}", entry.timestamp, entry.message);
//! }
//! # Ok::<(), ocrdiff::Error>(())
//! ```
//!
//! ## Known limitations
//!
//! - Matching is position-blind: identical text that merely moved or
//!   reordered never flags.
//! - Comparison covers `min(page counts)` pages; trailing pages of the
//!   longer document are ignored without a warning.
//! - A stuck OCR or rasterization call blocks the worker indefinitely; no
//!   internal timeouts are enforced.
//! - Concurrent runs against the same output directory are unsupported.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Run configuration
pub mod config;

// Pipeline stages
pub mod diff;
pub mod geometry;
pub mod highlight;
pub mod matching;
pub mod ocr;
pub mod rasterize;
pub mod report;

// Orchestration
pub mod compare;

pub use compare::events::{
    CancelFlag, ChannelSink, CompareEvent, EventSink, LogEntry, NullSink, Severity,
};
pub use compare::{
    spawn_comparison, CompareJob, ComparisonRunner, RunContext, RunOutcome, RunState, RunSummary,
};
pub use config::{CompareOptions, HighlightStyle, Sensitivity};
pub use error::{Error, Result};
pub use ocr::{OcrModelPaths, OcrsExtractor, Token, TokenExtractor};
pub use rasterize::{PageRasterizer, PdfiumRasterizer};
