//! Run events, logging, and cancellation.
//!
//! A comparison run executes on one worker thread while the caller's
//! interface thread polls for updates. Two pieces of state cross that
//! boundary: the cancellation flag (caller sets, worker reads) and the event
//! stream (worker writes, caller displays). [`CancelFlag`] is a shared atomic
//! for the former; [`EventSink`] abstracts the latter, with [`ChannelSink`]
//! as the message-queue hand-off for polling UIs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

/// Severity of a run log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine progress information
    Info,
    /// A step finished producing output
    Success,
    /// Something unusual that did not stop the run
    Warning,
    /// The run failed
    Error,
    /// Untagged
    None,
}

/// One timestamped entry in a run's log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Wall-clock time of the entry as `HH:MM:SS`
    pub timestamp: String,
    /// Human-readable message
    pub message: String,
    /// Entry severity
    pub severity: Severity,
}

impl LogEntry {
    /// Create an entry stamped with the current local time.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// Receiver for the events a run emits while executing.
///
/// All methods default to no-ops so sinks only override what they display.
pub trait EventSink: Send {
    /// Overall progress in percent, 0.0 to 100.0.
    fn on_progress(&mut self, _percent: f32) {}

    /// Current status line.
    fn on_status(&mut self, _message: &str) {}

    /// Estimated-time-remaining line.
    fn on_time_estimate(&mut self, _estimate: &str) {}

    /// A new log entry was appended to the run log.
    fn on_log(&mut self, _entry: &LogEntry) {}
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {}

/// One event of a comparison run, as carried by [`ChannelSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompareEvent {
    /// Overall progress in percent
    Progress(f32),
    /// Current status line
    Status(String),
    /// Estimated-time-remaining line
    TimeEstimate(String),
    /// Appended log entry
    Log(LogEntry),
}

/// Sink forwarding events over an mpsc channel to a polling consumer.
///
/// Send failures are ignored: a consumer that dropped its receiver simply
/// stops observing the run, it does not abort it.
pub struct ChannelSink {
    sender: mpsc::Sender<CompareEvent>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(sender: mpsc::Sender<CompareEvent>) -> Self {
        Self { sender }
    }

    /// Create a connected sink/receiver pair.
    pub fn channel() -> (Self, mpsc::Receiver<CompareEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl EventSink for ChannelSink {
    fn on_progress(&mut self, percent: f32) {
        let _ = self.sender.send(CompareEvent::Progress(percent));
    }

    fn on_status(&mut self, message: &str) {
        let _ = self.sender.send(CompareEvent::Status(message.to_string()));
    }

    fn on_time_estimate(&mut self, estimate: &str) {
        let _ = self.sender.send(CompareEvent::TimeEstimate(estimate.to_string()));
    }

    fn on_log(&mut self, entry: &LogEntry) {
        let _ = self.sender.send(CompareEvent::Log(entry.clone()));
    }
}

/// Shared cooperative cancellation flag.
///
/// Clones observe the same flag. The worker checks it once per page boundary;
/// cancelling mid-page lets that page finish.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a fresh, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag for reuse in a new run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
