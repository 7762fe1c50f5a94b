//! File-backed event sink.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use fogrid_core::EventSink;

/// An [`EventSink`] that appends one line per event to a buffered file.
pub struct FileSink {
    out: BufWriter<File>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
        })
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl EventSink for FileSink {
    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            log::error!("failed to write event line: {e}");
        }
    }
}
