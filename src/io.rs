//! Output sink (A4).
//!
//! `print` never writes to `std::io::stdout()` directly; it goes through
//! this trait so tests can assert byte-exact output and embedders can
//! redirect or discard it.

pub trait PrintWriter {
    fn write_line(&mut self, line: &str);
}

/// Writes to real stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Appends to an in-memory buffer, one line at a time, each followed by a
/// newline — matching exactly what `StdPrint` would have written.
#[derive(Debug, Default, Clone)]
pub struct CollectPrint {
    buffer: String,
}

impl CollectPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.buffer
    }
}

impl PrintWriter for CollectPrint {
    fn write_line(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }
}

/// Discards everything written to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPrint;

impl PrintWriter for NullPrint {
    fn write_line(&mut self, _line: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_print_joins_lines_with_newlines() {
        let mut sink = CollectPrint::new();
        sink.write_line("Hello from the Language!");
        sink.write_line("Result is 42");
        assert_eq!(sink.output(), "Hello from the Language!\nResult is 42\n");
    }

    #[test]
    fn null_print_discards() {
        let mut sink = NullPrint;
        sink.write_line("anything");
    }
}
