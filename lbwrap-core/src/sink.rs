//! Destinations for captured tool output.
//!
//! Every invocation hands its merged stdout/stderr to a sink, whether the
//! tool succeeded or not.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Receives the captured output of each invocation.
pub trait OutputSink {
    /// Emit one invocation's output.
    fn emit(&self, output: &str) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn emit(&self, output: &str) -> io::Result<()> {
        (**self).emit(output)
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn emit(&self, output: &str) -> io::Result<()> {
        (**self).emit(output)
    }
}

/// Writes output to the process's standard output, one line break after each invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, output: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", output)?;
        stdout.flush()
    }
}

/// Collects output in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return the collected output and reset the buffer.
    pub fn take(&self) -> String {
        std::mem::take(
            &mut *self
                .buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl OutputSink for BufferSink {
    fn emit(&self, output: &str) -> io::Result<()> {
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buffer.push_str(output);
        buffer.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink_appends_line_break() {
        let sink = BufferSink::new();
        sink.emit("first").unwrap();
        sink.emit("second").unwrap();
        assert_eq!(sink.contents(), "first\nsecond\n");
    }

    #[test]
    fn test_buffer_sink_clones_share_buffer() {
        let sink = BufferSink::new();
        let handle = sink.clone();
        sink.emit("shared").unwrap();
        assert_eq!(handle.contents(), "shared\n");
    }

    #[test]
    fn test_buffer_sink_take_resets() {
        let sink = BufferSink::new();
        sink.emit("once").unwrap();
        assert_eq!(sink.take(), "once\n");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let sink = BufferSink::new();
        let boxed: Box<dyn OutputSink> = Box::new(sink.clone());
        boxed.emit("boxed").unwrap();
        assert_eq!(sink.contents(), "boxed\n");
    }
}
