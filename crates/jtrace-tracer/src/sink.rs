use std::fmt;
use std::future::{self, Future};

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Marker repeated once per call depth level.
pub const INDENT_UNIT: &str = "| ";

/// Trait for implementing the destination of trace lines.
pub trait TraceSink {
    /// Error returned by this sink.
    type Error: std::error::Error;

    /// Writes a line about the thread with the given (tracer-allocated) ID,
    /// indented by `depth` levels.
    fn write_line(
        &mut self,
        thread_id: u64,
        depth: usize,
        text: &str,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Writes a line about the debuggee as a whole (e.g., its exit).
    fn write_notice(&mut self, text: &str) -> impl Future<Output = Result<(), Self::Error>>;

    /// Flushes any buffered line.
    fn flush(&mut self) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }
}

/// Indentation of a trace line, rendered as `depth` copies of
/// [INDENT_UNIT].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indent(pub usize);

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (0..self.0).try_for_each(|_| f.write_str(INDENT_UNIT))
    }
}

/// Formats a thread trace line.
///
/// The line starts with the thread ID right-aligned on 3 columns, followed
/// by the indentation and a `+-` branch marker.
pub fn format_line(thread_id: u64, depth: usize, text: &str) -> String {
    format!("{thread_id:>3} {}+-{text}\n", Indent(depth))
}

/// Sink writing plain-text trace lines into an asynchronous writer.
pub struct TextSink<W> {
    writer: W,
}

impl<W> TextSink<W> {
    /// Creates a sink writing into `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWrite + Unpin> TraceSink for TextSink<W> {
    type Error = std::io::Error;

    async fn write_line(
        &mut self,
        thread_id: u64,
        depth: usize,
        text: &str,
    ) -> Result<(), Self::Error> {
        let line = format_line(thread_id, depth, text);
        self.writer.write_all(line.as_bytes()).await
    }

    async fn write_notice(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::{Indent, TextSink, TraceSink, format_line};

    #[test]
    fn indent_rendering() {
        assert_eq!(Indent(0).to_string(), "");
        assert_eq!(Indent(1).to_string(), "| ");
        assert_eq!(Indent(3).to_string(), "| | | ");
    }

    #[test]
    fn line_layout() {
        assert_eq!(format_line(1, 0, "Foo.bar()"), "  1 +-Foo.bar()\n");
        assert_eq!(format_line(12, 2, "Foo.baz()"), " 12 | | +-Foo.baz()\n");
        assert_eq!(format_line(1234, 1, "x"), "1234 | +-x\n");
    }

    #[tokio::test]
    async fn text_sink_writes_lines_and_notices() {
        let mut sink = TextSink::new(Vec::new());

        sink.write_notice("-- VM Started --").await.expect("write notice");
        sink.write_line(1, 1, "Foo.bar()").await.expect("write line");
        sink.flush().await.expect("flush");

        let out = String::from_utf8(sink.into_inner()).expect("utf8");
        assert_eq!(out, "-- VM Started --\n  1 | +-Foo.bar()\n");
    }
}
