//! Response surface: where the status line, headers and body of a dispatched
//! fault are written.

use std::io::{self, Stdout, Write};

use crate::diagnostics::types::Status;

pub trait ResponseSink {
    fn status_line(&mut self, line: &str) -> io::Result<()>;
    fn header(&mut self, name: &str, value: &str) -> io::Result<()>;
    fn body(&mut self, body: &str) -> io::Result<()>;
}

/// Writes a CGI-style response to any writer: status line, headers, a blank
/// line, then the body.
pub struct WriterSink<W: Write> {
    inner: W,
    head_open: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            head_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl WriterSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ResponseSink for WriterSink<W> {
    fn status_line(&mut self, line: &str) -> io::Result<()> {
        self.head_open = true;
        write!(self.inner, "{}\r\n", line)
    }

    fn header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.head_open = true;
        write!(self.inner, "{}: {}\r\n", name, value)
    }

    fn body(&mut self, body: &str) -> io::Result<()> {
        if self.head_open {
            self.inner.write_all(b"\r\n")?;
            self.head_open = false;
        }
        self.inner.write_all(body.as_bytes())?;
        self.inner.flush()
    }
}

/// Collects the response in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSink {
    pub status_line: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ResponseSink for BufferSink {
    fn status_line(&mut self, line: &str) -> io::Result<()> {
        self.status_line = Some(line.to_string());
        Ok(())
    }

    fn header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.headers.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn body(&mut self, body: &str) -> io::Result<()> {
        self.body = Some(body.to_string());
        Ok(())
    }
}

/// The outcome of a dispatch: everything the driver writes before it ends
/// the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminate {
    pub status: Status,
    pub status_line: String,
    pub content_type: Option<&'static str>,
    pub body: String,
    pub exit_code: i32,
}

impl Terminate {
    pub fn write_to(&self, sink: &mut dyn ResponseSink) -> io::Result<()> {
        sink.status_line(&self.status_line)?;
        if let Some(content_type) = self.content_type {
            sink.header("content-type", content_type)?;
        }
        sink.body(&self.body)
    }

    /// Writes the response to stdout and exits the process.
    pub fn exit(self) -> ! {
        let _ = self.write_to(&mut WriterSink::stdout());
        std::process::exit(self.exit_code)
    }
}
