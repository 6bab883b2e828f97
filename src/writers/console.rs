//! Stream writer for stdout, stderr or any `io::Write`

use crate::core::{Level, LoggerError, Result, Writer};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes each record plus a newline to a fixed stream
///
/// `reopen` and `close` only flush; the stream itself stays open.
pub struct StreamWriter {
    stream: Mutex<Box<dyn Write + Send>>,
    name: &'static str,
}

impl StreamWriter {
    pub fn stdout() -> Self {
        Self {
            stream: Mutex::new(Box::new(io::stdout())),
            name: "stdout",
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Mutex::new(Box::new(io::stderr())),
            name: "stderr",
        }
    }

    pub fn new(stream: impl Write + Send + 'static) -> Self {
        Self {
            stream: Mutex::new(Box::new(stream)),
            name: "stream",
        }
    }

    fn flush(&self) -> Result<()> {
        self.stream
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing stream", self.name, e))
    }
}

impl Default for StreamWriter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Writer for StreamWriter {
    fn write(&self, _level: Level, _module: &str, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        self.stream
            .lock()
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing record", self.name, e))
    }

    fn reopen(&self) -> Result<()> {
        self.flush()
    }

    fn close(&self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str {
        self.name
    }
}
