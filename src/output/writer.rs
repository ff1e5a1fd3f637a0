//! Message sinks
//!
//! The engine hands every message to a [`MessageSink`] as soon as it is
//! produced, so records stream out while later pages are still in flight.

use crate::engine::Message;
use crate::error::Result;
use std::io::{self, BufWriter, Stdout, Write};

/// Receives messages in emission order
pub trait MessageSink {
    /// Accept one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Flush anything buffered
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects messages in memory
impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// Writes one JSON document per line
pub struct JsonLinesWriter<W: Write> {
    out: BufWriter<W>,
    lines_written: usize,
}

impl JsonLinesWriter<Stdout> {
    /// Writer on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
            lines_written: 0,
        }
    }

    /// Write any serializable value as one line
    pub fn write_line<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Get the number of lines written so far
    #[must_use]
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

impl<W: Write> MessageSink for JsonLinesWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.write_line(&message)?;
        // State is a checkpoint; make sure it is out before continuing
        if message.is_state() {
            self.out.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for JsonLinesWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesWriter")
            .field("lines_written", &self.lines_written)
            .finish_non_exhaustive()
    }
}
