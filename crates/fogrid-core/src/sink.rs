//! The line-sink abstraction for progress events.

/// An append-only sink receiving one human-readable line per event.
///
/// The engine reports per-move positions, blocked-path notices, objective
/// completions and option selections through this trait; it never touches
/// files or formatting concerns beyond composing the line itself.
pub trait EventSink {
    /// Append one line to the sink.
    fn emit(&mut self, line: &str);
}

/// A sink that collects lines in memory.
///
/// Mainly useful in tests, where the emitted event stream is asserted on
/// directly.
#[derive(Debug, Default)]
pub struct VecSink {
    pub lines: Vec<String>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
