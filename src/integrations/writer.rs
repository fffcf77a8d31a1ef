//! Plain text line sink backed by a logger
//!
//! Code that only knows how to write text (an `io::Write`) can be pointed at
//! an [`ErrorWriter`]; every completed line becomes one error-level call.

use crate::core::PrintLogger;
use std::io::{self, Write};

/// `io::Write` adapter that logs each line at error level.
///
/// Bytes are collected until a `\n` arrives, so `write!` calls that emit a
/// line in several pieces still produce a single log line. The newline itself
/// is not part of the message. A trailing partial line is logged on
/// [`flush`](Write::flush) or drop.
///
/// The adapter does no level gating of its own; the wrapped logger decides.
///
/// The recorded call site is the adapter itself: every line ends with
/// `file=writer.rs:<line>`, not the location of the code that wrote the text.
///
/// # Example
///
/// ```
/// use kv_logger::integrations::ErrorWriter;
/// use kv_logger::prelude::*;
/// use std::io::Write;
///
/// let out = MemorySink::new();
/// let logger = SyncLogger::new(out.clone());
///
/// let mut writer = ErrorWriter::new(&logger);
/// let device = "/dev/sda1";
/// writeln!(writer, "disk {device} is full").unwrap();
///
/// assert!(out.contents().contains("lvl=error msg=\"disk /dev/sda1 is full\""));
/// ```
pub struct ErrorWriter<L: PrintLogger> {
    logger: L,
    pending: Vec<u8>,
}

impl<L: PrintLogger> ErrorWriter<L> {
    pub fn new(logger: L) -> Self {
        Self {
            logger,
            pending: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &L {
        &self.logger
    }

    fn emit(&self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        self.logger.error(format_args!("{}", text));
    }
}

impl<L: PrintLogger> Write for ErrorWriter<L> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            if self.pending.is_empty() {
                self.emit(&rest[..pos]);
            } else {
                self.pending.extend_from_slice(&rest[..pos]);
                let line = std::mem::take(&mut self.pending);
                self.emit(&line);
            }
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line);
        }
        Ok(())
    }
}

impl<L: PrintLogger> Drop for ErrorWriter<L> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
