use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for rendered report lines.
///
/// Failures are returned so a sink can be used on its own, but the
/// reporter drops them: report output is best-effort.
pub trait LogSink: Send {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

// ─── WriterSink ──────────────────────────────────────────────────

/// Writes each line to an [`io::Write`], prefixed with the local time
/// as `YYYY/MM/DD HH:MM:SS `.
pub struct WriterSink<W> {
    out: W,
    timestamps: bool,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            timestamps: true,
        }
    }

    pub fn without_timestamp(out: W) -> Self {
        Self {
            out,
            timestamps: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if self.timestamps {
            let now = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
            writeln!(self.out, "{now} {line}")?;
        } else {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

// ─── TracingSink ─────────────────────────────────────────────────

/// Emits each line as an `info` event on target `metrics`, so reports
/// share the application's subscriber and formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        tracing::info!(target: "metrics", "{line}");
        Ok(())
    }
}

// ─── MemorySink ──────────────────────────────────────────────────

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Remove and return everything captured so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_owned());
        Ok(())
    }
}
