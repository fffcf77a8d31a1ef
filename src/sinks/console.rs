//! Process-standard streams

use super::Sink;
use std::io;

impl Sink {
    /// Standard output. Each line is written while holding the stdout lock.
    pub fn stdout() -> Self {
        Sink::new(io::stdout())
    }

    /// Standard error.
    pub fn stderr() -> Self {
        Sink::new(io::stderr())
    }
}
