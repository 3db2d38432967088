//! Line sinks
//!
//! A sink consumes one finished, single-line record at a time. Write
//! failures are dropped: a broken sink must never raise back into the
//! logging path.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Minimal line-writer consumed by the pipeline
pub trait Sink: Send + Sync {
    /// Write one line; the implementation appends the newline
    fn write_line(&self, line: &str);

    fn name(&self) -> &str {
        "sink"
    }
}

/// Default sink writing newline-terminated lines to standard error
#[derive(Debug, Default)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StderrSink {
    fn write_line(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", line);
    }

    fn name(&self) -> &str {
        "stderr"
    }
}

/// In-memory sink capturing lines for assertions in tests
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of everything written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_lines() {
        let sink = MemorySink::new();
        sink.write_line("first");
        sink.write_line("second");

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines(), vec!["first", "second"]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_memory_sink_shared_handle() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write_line("seen by both");
        assert_eq!(handle.lines(), vec!["seen by both"]);
    }
}
