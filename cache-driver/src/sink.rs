//! Output sinks
//!
//! Everything the driver shows the user goes through an [`OutputSink`]. The
//! runner and the printer never touch stdout or files directly, so a run can
//! be sent to the console, a transcript file, both at once, or captured in
//! memory for tests.

use crate::error::{DriverError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A line-oriented destination for driver output.
pub trait OutputSink {
    /// Writes one line. The sink appends the line terminator.
    fn line(&mut self, text: &str) -> io::Result<()>;

    /// Flushes buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn line(&mut self, text: &str) -> io::Result<()> {
        (**self).line(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn line(&mut self, text: &str) -> io::Result<()> {
        (**self).line(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes to standard output.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn line(&mut self, text: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{text}")
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Writes to a file through a buffer.
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| DriverError::file(path, e))?;
        Ok(FileSink {
            writer: BufWriter::new(file),
        })
    }
}

impl OutputSink for FileSink {
    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Sends every line to two sinks, `first` then `second`.
#[derive(Debug)]
pub struct TeeSink<A, B> {
    first: A,
    second: B,
}

impl<A: OutputSink, B: OutputSink> TeeSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        TeeSink { first, second }
    }

    /// Splits the tee back into its two sinks.
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: OutputSink, B: OutputSink> OutputSink for TeeSink<A, B> {
    fn line(&mut self, text: &str) -> io::Result<()> {
        self.first.line(text)?;
        self.second.line(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines, each terminated by `\n`.
    pub fn contents(&self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl OutputSink for MemorySink {
    fn line(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }
}
