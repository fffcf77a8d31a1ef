//! Output sinks
//!
//! A [`Sink`] is the byte-stream destination of a logger. It is shared by a
//! root logger and everything derived from it, and guarded by its own lock so
//! each formatted line reaches the underlying writer in one piece.

pub mod console;
pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Hand a complete line to the writer as one `write_all`.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(line)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }

    /// Whether both handles point at the same underlying writer.
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// Writes through the shared lock, so a `Sink` can itself be handed to code
/// that expects a plain writer.
impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_line(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(self)
    }
}
