//! Injectable time source and process terminator
//!
//! Both are constructor-level dependencies of a logger so that tests can pin
//! the timestamp and observe `fatal` without ending the test process.

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use std::fmt;
use std::sync::Arc;

/// Zero-argument "now" provider used to stamp every line.
///
/// Times carry their UTC offset, so a line reads
/// `2024-01-02 03:04:05 +01:00` in whatever zone the clock reports.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>);

impl Clock {
    pub fn new<F>(now: F) -> Self
    where
        F: Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
    {
        Self(Arc::new(now))
    }

    /// The system clock in the host's local time zone.
    pub fn system() -> Self {
        Self::new(|| Local::now().fixed_offset())
    }

    /// The system clock in UTC.
    pub fn utc() -> Self {
        Self::new(|| Utc::now().fixed_offset())
    }

    /// A clock frozen at `at`, keeping its offset.
    pub fn fixed<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        let at = at.fixed_offset();
        Self::new(move || at)
    }

    #[inline]
    pub fn now(&self) -> DateTime<FixedOffset> {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock")
    }
}

/// Called by `fatal` after the line is written.
///
/// The default calls [`std::process::exit`] and never returns. A replacement
/// hook that does return lets `fatal` return to its caller.
#[derive(Clone)]
pub struct ExitHook(Arc<dyn Fn(i32) + Send + Sync>);

impl ExitHook {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    pub fn process_exit() -> Self {
        Self::new(|code| std::process::exit(code))
    }

    #[inline]
    pub fn exit(&self, code: i32) {
        (self.0)(code)
    }
}

impl Default for ExitHook {
    fn default() -> Self {
        Self::process_exit()
    }
}

impl fmt::Debug for ExitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExitHook")
    }
}
