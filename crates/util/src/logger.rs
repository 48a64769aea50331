// Diagnostic log sinks.
//
// `LogSink` is the single-method interface the debug window exposes to
// the rest of the application; everything that wants to surface a line
// of diagnostics takes a sink instead of a concrete window type.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// Sink for diagnostic lines.
///
/// Implementations must tolerate being called from worker threads.
pub trait LogSink: Send + Sync {
    fn log(&self, msg: &str);
}

/// A sink that drops everything. Useful as a default collaborator when
/// no debug output is wanted.
#[derive(Debug, Default)]
pub struct VoidLog;

impl LogSink for VoidLog {
    fn log(&self, _msg: &str) {}
}

/// Captures lines in memory so they can be read back later, either by
/// a debug view or by tests asserting on diagnostics.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl LogSink for RecordingLog {
    fn log(&self, msg: &str) {
        self.lines.lock().unwrap().push(msg.to_string());
    }
}

/// Forwards lines over a channel so a worker thread can log without
/// touching the consumer directly. The receiving half is drained by
/// whoever owns the display (typically on the UI thread).
#[derive(Debug)]
pub struct ChannelLog {
    tx: Mutex<Sender<String>>,
}

impl ChannelLog {
    /// Returns the sink and the receiving end of its channel.
    pub fn new() -> (ChannelLog, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (ChannelLog { tx: Mutex::new(tx) }, rx)
    }
}

impl LogSink for ChannelLog {
    fn log(&self, msg: &str) {
        // A closed receiver just means the display went away first.
        if self.tx.lock().unwrap().send(msg.to_string()).is_err() {
            log::debug!("log channel closed, dropping: {msg}");
        }
    }
}
